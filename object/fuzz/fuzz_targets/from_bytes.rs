#![no_main]
use libfuzzer_sys::{fuzz_target, Corpus};
use std::error::Error;

fuzz_target!(|data: &[u8]| -> Corpus {
    match fuzz(data) {
        Ok(true) => Corpus::Keep,
        _ => Corpus::Reject,
    }
});

fn fuzz(data: &[u8]) -> Result<bool, Box<dyn Error>> {
    // reading arbitrary bytes must never panic
    let obj = dcmtree_object::from_bytes(data)?;
    if !obj.is_complete() || obj.meta().is_none() {
        return Ok(false);
    }

    // a clean read must survive a write and a second read
    let mut bytes = Vec::new();
    obj.write_to(&mut bytes)
        .expect("writing a cleanly read file should always be successful");
    let obj2 = dcmtree_object::from_bytes(&bytes).expect("written file should always be read back");
    assert!(obj2.is_complete());
    assert_eq!(obj.dataset(), obj2.dataset());

    Ok(true)
}
