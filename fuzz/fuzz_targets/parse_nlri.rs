#![no_main]

use libfuzzer_sys::fuzz_target;
use nlricore::bgp::AddressFamily;
use nlricore::bgp::nlri::{Nlri, NlriIter};

fuzz_target!(|data: (AddressFamily, bool, &[u8])| {
    let (family, addpath, raw) = data;
    for nlri in NlriIter::new(raw, family, addpath).flatten() {
        let composed = nlri.to_bytes(addpath);
        assert_eq!(composed.len(), nlri.compose_len(addpath));
        let (reparsed, rest) = Nlri::from_octets(
            &composed, family, addpath
        ).unwrap();
        assert!(rest.is_empty());
        assert_eq!(reparsed, nlri);
    }
});
