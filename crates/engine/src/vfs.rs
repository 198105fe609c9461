//! Private in-memory filesystem for the embedded engine.
//!
//! Stands in for the MEMFS the original Emscripten build mounted: the WAD
//! and the engine's save files live here, distinct from durable disk
//! storage. Paths are absolute, `/`-separated strings.

use std::collections::BTreeMap;

/// Metadata for a single VFS entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub is_dir: bool,
    pub size: usize,
}

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Dir(BTreeMap<String, Node>),
}

/// In-memory file tree rooted at `/`.
#[derive(Debug, Clone)]
pub struct Vfs {
    root: BTreeMap<String, Node>,
}

impl Vfs {
    pub fn new() -> Self {
        Self {
            root: BTreeMap::new(),
        }
    }

    /// Create a directory under `parent`. Parent must already exist.
    /// Creating an existing directory is a no-op.
    pub fn create_path(&mut self, parent: &str, name: &str) -> bool {
        let Some(dir) = self.dir_mut(parent) else {
            return false;
        };
        match dir.get(name) {
            Some(Node::File(_)) => false,
            Some(Node::Dir(_)) => true,
            None => {
                dir.insert(name.to_string(), Node::Dir(BTreeMap::new()));
                true
            }
        }
    }

    /// Create (or overwrite) a file under `parent`. Parent must exist.
    pub fn create_file(&mut self, parent: &str, name: &str, bytes: &[u8]) -> bool {
        let Some(dir) = self.dir_mut(parent) else {
            return false;
        };
        if matches!(dir.get(name), Some(Node::Dir(_))) {
            return false;
        }
        dir.insert(name.to_string(), Node::File(bytes.to_vec()));
        true
    }

    /// Write a file at an absolute path, creating intermediate directories.
    ///
    /// This mirrors the engine-side FS layer, which resolves its own parents
    /// when the game writes a save.
    pub fn write_file(&mut self, path: &str, bytes: &[u8]) -> bool {
        let (parent, name) = match split_path(path) {
            Some(v) => v,
            None => return false,
        };
        let mut dir = &mut self.root;
        for part in components(parent) {
            let entry = dir
                .entry(part.to_string())
                .or_insert_with(|| Node::Dir(BTreeMap::new()));
            match entry {
                Node::Dir(children) => dir = children,
                Node::File(_) => return false,
            }
        }
        if matches!(dir.get(name), Some(Node::Dir(_))) {
            return false;
        }
        dir.insert(name.to_string(), Node::File(bytes.to_vec()));
        true
    }

    pub fn read_file(&self, path: &str) -> Option<&[u8]> {
        match self.node(path)? {
            Node::File(bytes) => Some(bytes),
            Node::Dir(_) => None,
        }
    }

    /// Names of entries in a directory, or None if the path is not a dir.
    pub fn list_dir(&self, path: &str) -> Option<Vec<String>> {
        let dir = if path == "/" {
            &self.root
        } else {
            match self.node(path)? {
                Node::Dir(children) => children,
                Node::File(_) => return None,
            }
        };
        Some(dir.keys().cloned().collect())
    }

    pub fn stat(&self, path: &str) -> Option<Stat> {
        if path == "/" {
            return Some(Stat {
                is_dir: true,
                size: 0,
            });
        }
        match self.node(path)? {
            Node::File(bytes) => Some(Stat {
                is_dir: false,
                size: bytes.len(),
            }),
            Node::Dir(_) => Some(Stat {
                is_dir: true,
                size: 0,
            }),
        }
    }

    fn node(&self, path: &str) -> Option<&Node> {
        let mut parts = components(path);
        let first = parts.next()?;
        let mut node = self.root.get(first)?;
        for part in parts {
            match node {
                Node::Dir(children) => node = children.get(part)?,
                Node::File(_) => return None,
            }
        }
        Some(node)
    }

    fn dir_mut(&mut self, path: &str) -> Option<&mut BTreeMap<String, Node>> {
        if path == "/" {
            return Some(&mut self.root);
        }
        let mut dir = &mut self.root;
        for part in components(path) {
            match dir.get_mut(part)? {
                Node::Dir(children) => dir = children,
                Node::File(_) => return None,
            }
        }
        Some(dir)
    }
}

impl Default for Vfs {
    fn default() -> Self {
        Self::new()
    }
}

fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|p| !p.is_empty())
}

fn split_path(path: &str) -> Option<(&str, &str)> {
    let path = path.trim_end_matches('/');
    let idx = path.rfind('/')?;
    let name = &path[idx + 1..];
    if name.is_empty() {
        return None;
    }
    let parent = if idx == 0 { "/" } else { &path[..idx] };
    Some((parent, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_read_file_in_root() {
        let mut vfs = Vfs::new();
        assert!(vfs.create_file("/", "doom1.wad", b"IWAD"));
        assert_eq!(vfs.read_file("/doom1.wad"), Some(b"IWAD".as_slice()));
    }

    #[test]
    fn create_file_requires_existing_parent() {
        let mut vfs = Vfs::new();
        assert!(!vfs.create_file("/missing", "f", b"x"));
        assert!(vfs.create_path("/", "doom"));
        assert!(vfs.create_file("/doom", "f", b"x"));
        assert_eq!(vfs.read_file("/doom/f"), Some(b"x".as_slice()));
    }

    #[test]
    fn write_file_creates_parents() {
        let mut vfs = Vfs::new();
        assert!(vfs.write_file("/home/web_user/doomsav0.dsg", b"save"));
        assert_eq!(
            vfs.read_file("/home/web_user/doomsav0.dsg"),
            Some(b"save".as_slice())
        );
        assert!(vfs.stat("/home/web_user").unwrap().is_dir);
    }

    #[test]
    fn list_dir_and_stat() {
        let mut vfs = Vfs::new();
        vfs.create_path("/", "doom");
        vfs.create_file("/doom", "a.dsg", b"aa");
        vfs.create_file("/doom", "b.dsg", b"b");

        let names = vfs.list_dir("/doom").unwrap();
        assert_eq!(names, vec!["a.dsg".to_string(), "b.dsg".to_string()]);

        let stat = vfs.stat("/doom/a.dsg").unwrap();
        assert!(!stat.is_dir);
        assert_eq!(stat.size, 2);
        assert!(vfs.stat("/doom").unwrap().is_dir);
        assert!(vfs.stat("/nope").is_none());
    }

    #[test]
    fn read_missing_returns_none() {
        let vfs = Vfs::new();
        assert!(vfs.read_file("/ghost").is_none());
        assert!(vfs.list_dir("/ghost").is_none());
    }
}
