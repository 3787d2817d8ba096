pub mod coldkeys;

pub use coldkeys::{default_wallet_path, list_local_coldkeys};
