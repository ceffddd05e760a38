//! Shared helpers for the gridwalk lock tests.
