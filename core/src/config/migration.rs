//! Versioned configuration upgrades

use anyhow::Result;

/// Implemented by persisted configuration that carries a schema version
pub trait Migrate {
	fn current_version(&self) -> u32;

	fn target_version() -> u32
	where
		Self: Sized;

	/// Upgrade in place to [`Migrate::target_version`]
	fn migrate(&mut self) -> Result<()>;

	fn needs_migration(&self) -> bool
	where
		Self: Sized,
	{
		self.current_version() < Self::target_version()
	}
}
