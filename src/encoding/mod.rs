// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Encoding helpers used by the decoder. Split out as its own module
//! (mirroring the source library's dedicated `utf_helper.hpp`/`.cpp`)
//! rather than inlined at call sites, since both the statement-body
//! decoder and the `UTF8` encoding scheme's direct-UTF-8 path need it.

pub mod utf8;
