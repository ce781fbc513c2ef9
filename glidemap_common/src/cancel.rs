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
use std::sync::{Arc, atomic::{AtomicBool, Ordering}};

/// cooperative cancellation flag that is checked by long running batch loops (e.g. between
/// files and rows of the raster merge). Clones share the same flag
#[derive(Clone,Debug,Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>
}

impl CancelToken {
    pub fn new()->Self { CancelToken { flag: Arc::new( AtomicBool::new(false)) } }

    pub fn cancel (&self) {
        self.flag.store( true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled (&self)->bool {
        self.flag.load( Ordering::Relaxed)
    }

    /// set this token on receiving a ctrl-c signal.
    /// Note this does *not* exit the process - it is up to the loops checking the token to wind down
    pub fn cancel_on_ctrlc (&self)->Result<(),ctrlc::Error> {
        let token = self.clone();
        ctrlc::set_handler( move || {
            token.cancel();
        })
    }
}
