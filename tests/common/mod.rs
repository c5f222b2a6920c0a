#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Two articles used by the ranking scenarios: id 2 out-sells id 1 but
/// id 1 converts better.
pub const SCENARIO_CSV: &str = "\
id,post_title,sales,cv,page_view,click,imp,avg_position
1,First post,0,2,10,5,100,4
2,Second post,5,0,100,20,50,2
";

/// A fuller export with ranking, category, and URL columns.
pub const METRICS_CSV: &str = "\
POST_ID,post_title,category,URL,session,page_view,sales,cv,click,imp,avg_position,7日間平均順位,30日間平均順位,split_categories
p-100,Rust ownership guide,\"tech, rust\",https://example.com/rust,12.34,120,3,1,10,400,3.26,4.2,5.01,tech
p-200,Travel packing list,life,/travel,8,45,0,0,2,90,12,11,9.5,life
p-300,Rust async intro,\"tech,news\",https://example.com/async,n/a,80,0,4,0,250,,2,3,tech
";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    /// Writes raw bytes, for encoding and BOM cases.
    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }
}
