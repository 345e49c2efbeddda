#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let (config, _warnings) = tugboat::config::parse_legacy(content, Path::new("fuzz"));
        let _ = config.validate();
        let _ = config.ignore_rules();
        let _ = config.ssh_target();
    }
});
