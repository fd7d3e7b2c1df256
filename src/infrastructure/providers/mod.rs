pub mod static_provider;
pub mod sysinfo_provider;

pub use static_provider::StaticProvider;
pub use sysinfo_provider::SysinfoProvider;
