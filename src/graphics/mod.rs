// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Component E/F/G: bitmap storage, canvas compositing, DRCS
//! rasterization and per-region layout. Grounded on `renderer/bitmap.hpp`,
//! the pixel-blending approach in `renderer/alphablend_x86.hpp`, the
//! DRCS-to-bitmap path in `renderer_impl.cpp`, and its region-drawing loop.

pub mod bitmap;
pub mod canvas;
pub mod drcs;
pub mod region;

pub use bitmap::{Bitmap, Image};
