mod bus;
mod types;

pub use bus::{MessageBus, ToneSender};
pub use types::SynthMessage;
