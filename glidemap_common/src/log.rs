/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
//! the logging collaborator of the pipeline stages.
//!
//! Every status message is emitted as a `tracing` event and, if a progress sink is attached,
//! forwarded to it as a plain string. Forwarding is fire-and-forget: messages are dropped if the
//! channel is full or closed, and the producer is never blocked.

use kanal::{Receiver, Sender};
use tracing::{info, warn, error, debug};
use tracing_subscriber::EnvFilter;

pub const DEFAULT_PROGRESS_CAPACITY: usize = 1024;

/// optional side channel for human readable progress messages
#[derive(Clone,Default)]
pub struct ProgressSink {
    tx: Option<Sender<String>>
}

impl ProgressSink {
    /// a sink that only logs
    pub fn none()->Self { ProgressSink { tx: None } }

    pub fn new (tx: Sender<String>)->Self { ProgressSink { tx: Some(tx) } }

    /// create a sink together with the receiver end of its (bounded) channel
    pub fn with_channel (capacity: usize)->(Self, Receiver<String>) {
        let (tx,rx) = kanal::bounded(capacity);
        (ProgressSink::new(tx), rx)
    }

    pub fn is_attached (&self)->bool { self.tx.is_some() }

    fn forward (&self, msg: String) {
        if let Some(tx) = &self.tx {
            // full or closed channels are not our problem
            let _ = tx.try_send(msg);
        }
    }

    pub fn info (&self, msg: impl Into<String>) {
        let msg = msg.into();
        info!("{}", msg);
        self.forward(msg);
    }

    pub fn warn (&self, msg: impl Into<String>) {
        let msg = msg.into();
        warn!("{}", msg);
        self.forward(msg);
    }

    pub fn error (&self, msg: impl Into<String>) {
        let msg = msg.into();
        error!("{}", msg);
        self.forward(msg);
    }

    /// only logged, never forwarded (too chatty for progress displays)
    pub fn debug (&self, msg: impl AsRef<str>) {
        debug!("{}", msg.as_ref());
    }
}

impl std::fmt::Debug for ProgressSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ProgressSink(attached={})", self.is_attached())
    }
}

/// emit `msg` as an info event and forward it to `sink` (if attached)
pub fn log_output (msg: impl Into<String>, sink: &ProgressSink) {
    sink.info(msg)
}

/// install a global fmt subscriber. Use RUST_LOG to set the max level (default is "info").
/// Note this only succeeds if there is no global subscriber set yet
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else( |_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
