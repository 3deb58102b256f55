#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use tsample_tensor as tensor;

#[doc(inline)]
pub use tsample_tensor_ops as tensor_ops;

#[doc(inline)]
pub use tsample_imgproc as imgproc;

#[doc(inline)]
pub use tsample_io as io;
