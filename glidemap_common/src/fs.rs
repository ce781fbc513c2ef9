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
use std::fs::{self,DirEntry,File};
use std::io::{self, Error as IOError, ErrorKind};
use std::env;
use std::path::{Path,PathBuf};

use crate::io_error;

type Result<T> = std::result::Result<T,std::io::Error>;

pub fn ensure_dir (path: impl AsRef<Path>)->io::Result<()> {
    let path = path.as_ref();
    if !path.is_dir() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// make sure the parent directory of a file path exists
pub fn ensure_parent_dir (path: impl AsRef<Path>) -> io::Result<()> {
    match path.as_ref().parent() {
        Some(dir) if !dir.as_os_str().is_empty() => ensure_dir(dir),
        _ => Ok(())
    }
}

pub fn path_to_lossy_string (path: impl AsRef<Path>) -> String {
    path.as_ref().to_string_lossy().as_ref().to_string()
}

/// the sibling path we write to before atomically renaming into `path`
pub fn tmp_sibling_path (path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let mut fname = path.file_name().map( |f| f.to_os_string()).unwrap_or_default();
    fname.push(".tmp");
    path.with_file_name(fname)
}

/// create `path` by first writing to a temporary sibling file and then renaming it, so that
/// readers never see a partially written file. The temporary file is removed if `write_fn` fails
pub fn write_atomic<F> (path: impl AsRef<Path>, write_fn: F) -> Result<()> where F: FnOnce(&mut File)->Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let tmp_path = tmp_sibling_path(path);
    let res = File::create(&tmp_path).and_then( |mut file| {
        write_fn(&mut file)?;
        file.sync_all()
    });

    match res {
        Ok(()) => fs::rename( &tmp_path, path),
        Err(e) => {
            let _ = fs::remove_file( &tmp_path);
            Err(e)
        }
    }
}

/// depth first directory traversal. Entries of each directory are visited in file name order so
/// that results are stable across runs (`fs::read_dir` does not guarantee any order)
pub fn visit_dirs_sorted (dir: &Path, recursive: bool, cb: &mut dyn FnMut(&DirEntry)) -> io::Result<()> {
    if dir.is_dir() {
        let mut entries: Vec<DirEntry> = fs::read_dir(dir)?.collect::<io::Result<Vec<DirEntry>>>()?;
        entries.sort_by_key( |e| e.file_name());

        for entry in &entries {
            let path = entry.path();
            if path.is_dir() {
                if recursive { visit_dirs_sorted(&path, recursive, cb)?; }
            } else {
                cb(entry);
            }
        }
    }
    Ok(())
}

/// recursively collect all files below `dir` whose name is exactly `fname`, in stable traversal order
pub fn files_named_in_tree<P: AsRef<Path>> (dir: &P, fname: &str) -> Result<Vec<PathBuf>> {
    let dir: &Path = dir.as_ref();
    if !dir.is_dir() {
        return Err( io_error!(ErrorKind::NotFound, "not a directory {:?}", dir))
    }

    let mut list: Vec<PathBuf> = Vec::new();
    visit_dirs_sorted( dir, true, &mut |e| {
        if e.file_name().to_str() == Some(fname) {
            list.push( e.path())
        }
    })?;

    Ok(list)
}

/// copy a file, creating the target directory if required
pub fn copy_file (src: impl AsRef<Path>, tgt: impl AsRef<Path>) -> Result<u64> {
    ensure_parent_dir( tgt.as_ref())?;
    fs::copy( src, tgt)
}

/// replace leading '~' and '$<name>' path elements
pub fn replace_env_var_path (path: impl AsRef<Path>)->Result<PathBuf> {
    let mut p = PathBuf::new();

    for (n,c) in path.as_ref().iter().enumerate() {
        let e = c.to_str().ok_or( IOError::new(ErrorKind::Other, format!("invalid path: {:?}", path.as_ref())))?;

        if e == "~" && n == 0 {
            p.push( env::var("HOME").map_err( |err| IOError::new(ErrorKind::Other, "HOME not set"))?)
        } else if e.len() > 1 && e.starts_with('$') {
            p.push( env::var( &e[1..]).map_err( |err| IOError::new(ErrorKind::Other, format!("{e} not set")))?)
        } else {
            p.push(e)
        }
    }

    Ok(p)
}

/* #region EnvPathBuf *******************************************************************************/

use serde::ser::{Serialize as SerializeTrait, Serializer};
use serde::de::{Deserialize as DeserializeTrait, Deserializer};
use std::{fmt::Debug,ops::Deref,ffi::OsStr};

/// a PathBuf that can use env vars as path elements (expanded when deserialized)
#[derive(Clone,PartialEq)]
pub struct EnvPathBuf(PathBuf);

impl EnvPathBuf {
    pub fn new (path: impl AsRef<Path>)->Self { EnvPathBuf( path.as_ref().to_path_buf()) }
}

impl Debug for EnvPathBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl Deref for EnvPathBuf {
    type Target = PathBuf;

    fn deref (&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for EnvPathBuf {
    #[inline]
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl AsRef<OsStr> for EnvPathBuf {
    #[inline]
    fn as_ref(&self) -> &OsStr {
        self.0.as_ref()
    }
}

impl From<PathBuf> for EnvPathBuf {
    fn from (path: PathBuf)->Self { EnvPathBuf(path) }
}

// note this means we serialize the expanded pathbuf
impl SerializeTrait for EnvPathBuf {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> where S: Serializer {
        self.0.serialize( serializer)
    }
}

impl<'de> DeserializeTrait<'de> for EnvPathBuf {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error> where D: Deserializer<'de> {
        let a = String::deserialize(deserializer)?;
        let ep = PathBuf::from(a);
        let p = replace_env_var_path(&ep).map_err(|e| serde::de::Error::custom(format!("failed to expand path {ep:?}: {e}")))?;

        Ok( EnvPathBuf(p) )
    }
}

/* #endregion EnvPathBuf */
