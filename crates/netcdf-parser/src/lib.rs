//! NetCDF reader for National Water Model channel output.
//!
//! NWM channel files (`CHRTOUT_DOMAIN1.comp` in the retrospective archive,
//! `channel_rt*.conus.nc` in the forecast archive) store streamflow as a
//! scaled integer per river reach along a single feature dimension. This
//! crate opens those files with the native `netcdf` library and reads single
//! positions out of the `streamflow` variable.
//!
//! Values are returned in the archive's native scale; callers divide by
//! [`nwm_common::NATIVE_SCALE`] to get m³/s.

pub mod error;
pub mod native;

pub use error::{NetCdfError, NetCdfResult};
pub use native::{silence_hdf5_errors, NetcdfStreamflowSource, STREAMFLOW_VARIABLE};
