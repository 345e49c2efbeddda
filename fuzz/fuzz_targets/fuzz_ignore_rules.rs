#![no_main]

use libfuzzer_sys::fuzz_target;
use tugboat::IgnoreRules;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // First line is the pattern list, the rest are paths to test
        let mut lines = content.lines();
        let patterns = lines.next().unwrap_or_default().split(',');
        if let Ok(rules) = IgnoreRules::compile(patterns) {
            for path in lines {
                let _ = rules.is_ignored(path, false);
                let _ = rules.is_ignored(path, true);
            }
        }
    }
});
