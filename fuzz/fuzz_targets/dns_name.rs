#![no_main]

use dnsconn::dns::{is_fqdn, label_count};
use libfuzzer_sys::{Corpus, fuzz_target};

fuzz_target!(|data: &[u8]| -> Corpus {
    let Ok(name) = std::str::from_utf8(data) else {
        return Corpus::Reject;
    };

    // Every label is at least one character long
    let labels = label_count(name);
    assert!(labels <= name.chars().count());

    if is_fqdn(name) {
        assert!(name.ends_with('.'));
    }

    Corpus::Keep
});
