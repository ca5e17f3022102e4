//! Example: drive the backlight from both directions without hardware.
//!
//! Run with: `RUST_LOG=debug cargo run --example simulate_hotkey`

use ec_kbd_backlight::events::code;
use ec_kbd_backlight::{
    BacklightControl, BacklightController, BacklightError, MockChannel, RecordingEndpoint,
    StaticResolver, dispatch_event,
};

fn main() -> Result<(), BacklightError> {
    // Initialize logging (optional)
    env_logger::init();

    let controller = BacklightController::new(MockChannel::new(), StaticResolver::new("IFLX14I01"));
    let endpoint = RecordingEndpoint::new();
    controller.register(Box::new(endpoint.clone()))?;

    // A caller asks for the middle step
    controller.set(1)?;

    // The user presses the backlight hotkey; the firmware reports "max"
    dispatch_event(&controller, &[0x00, code::KBD_BRT_MAX, 0x00, 0x00]);

    // Out of range requests are rejected, not clamped
    if let Err(e) = controller.set(5) {
        eprintln!("Error: {}", e);
    }

    println!("Brightness: {}", controller.brightness());
    println!("Notified steps: {:?}", endpoint.steps());
    println!("EC writes: {:?}", controller.channel().writes());

    controller.unregister();
    Ok(())
}
