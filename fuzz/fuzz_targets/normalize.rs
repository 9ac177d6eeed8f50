#![no_main]

use libfuzzer_sys::fuzz_target;
use testsync_core::RelPath;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // Anything that normalizes must normalize to itself, and never escape the root
        if let Ok(path) = RelPath::parse(s) {
            let again = RelPath::parse(path.as_str()).ok();
            assert_eq!(again.as_ref(), Some(&path));
            assert!(path.components().all(|c| c != ".." && c != "." && !c.is_empty()));
        }
    }
});
