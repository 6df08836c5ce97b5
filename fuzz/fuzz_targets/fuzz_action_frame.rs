#![no_main]

use libfuzzer_sys::fuzz_target;
use rampart::{Frame, Strategy, Tuning, UnitCatalog};

// Arbitrary bytes through the decoder, then anything that decodes through
// telemetry. Neither step may panic.
fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(frame) = Frame::parse(line) else {
        return;
    };
    let mut strategy = Strategy::new(Tuning::default(), UnitCatalog::default());
    strategy.on_action_frame(&frame);
    strategy.on_action_frame(&frame);

    let histogram = strategy.telemetry().histogram();
    let attacks = u32::try_from(frame.events.attacks.len()).unwrap_or(u32::MAX);
    assert!(histogram.iter().sum::<u32>() <= attacks);
});
