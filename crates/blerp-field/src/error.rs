/// An error type for value fields and the scalers operating on them.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FieldError {
    /// Error when the data length does not match the field size.
    #[error("Data length ({0}) does not match the field size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when a field type has no channels.
    #[error("Value fields need at least one channel per pixel")]
    NoChannels,

    /// Error when two fields that must share a size do not.
    #[error("Invalid field size: expected {0}x{1}, got {2}x{3}")]
    InvalidFieldSize(usize, usize, usize, usize),

    /// Error when a field is smaller than an operation requires.
    #[error("Field of size {width}x{height} is too small, need at least {min_width}x{min_height}")]
    FieldTooSmall {
        /// Width of the offending field
        width: usize,
        /// Height of the offending field
        height: usize,
        /// Minimum accepted width
        min_width: usize,
        /// Minimum accepted height
        min_height: usize,
    },

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel coordinates ({0}, {1}) are out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index ({0}) is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when the backing buffer could not be allocated.
    #[error("Failed to allocate {0} bytes for the field data")]
    AllocationFailed(usize),
}
