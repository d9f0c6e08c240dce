//! Storage primitives for units
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │  Transport (fd table, errno codes)  │
//! └─────────────────────────────────────┘
//!          │ one Session per open fd
//!          ▼
//! ┌─────────────────────────────────────┐
//! │  Session (cursor + cancel token)    │
//! │  - read / write / seek / control    │
//! └─────────────────────────────────────┘
//!          │ locks the unit for every op
//!          ▼
//! ┌─────────────────────────────────────┐
//! │  StorageUnit                        │
//! │  - Mutex<Buffer>                    │
//! └─────────────────────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────────────────────┐
//! │  Buffer (this module)               │
//! │  - zero-filled Vec<u8>              │
//! │  - grow_to() doubles on seek        │
//! └─────────────────────────────────────┘
//! ```

pub mod buffer;

pub use buffer::Buffer;
