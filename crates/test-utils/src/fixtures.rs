//! Common test fixtures for NWM fetch tests.
//!
//! Canonical archive paths and index table contents used across the suite.

/// Archive paths as they appear under the mount point.
pub mod archive_paths {
    pub const RETROSPECTIVE: &str =
        "retrospective/full_physics/1993/199312312300.CHRTOUT_DOMAIN1.comp";

    pub const SHORT_RANGE: &str =
        "forecast/nwm.20190102/short_range/nwm.t11z.short_range.channel_rt.f001.conus.nc";

    pub const MEDIUM_RANGE: &str =
        "forecast/nwm.20190102/medium_range/nwm.t06z.medium_range.channel_rt.f003.conus.nc";

    pub const MEDIUM_RANGE_MEMBER: &str =
        "forecast/nwm.20200515/medium_range_mem3/nwm.t06z.medium_range.channel_rt_3.f204.conus.nc";
}

/// Index table rows as `(position, comid)`.
///
/// Comid 900 is the default comid of the fetcher CLI.
pub const INDEX_ROWS: &[(u64, i64)] = &[
    (0, 101),
    (1, 179),
    (42, 900),
    (43, 4_512_772),
    (2_729_076, 166_176_984),
];

/// Header line written ahead of [`INDEX_ROWS`].
pub const INDEX_HEADER: &str = "feature_index,comid";
