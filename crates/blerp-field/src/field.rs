use crate::error::FieldError;

/// Field size in pixels
///
/// A struct to represent the size of a value field in pixels.
///
/// # Examples
///
/// ```
/// use blerp_field::FieldSize;
///
/// let size = FieldSize {
///   width: 37,
///   height: 20,
/// };
///
/// assert_eq!(size.width, 37);
/// assert_eq!(size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldSize {
    /// Width of the field in pixels
    pub width: usize,
    /// Height of the field in pixels
    pub height: usize,
}

impl FieldSize {
    /// Number of pixels covered by the size.
    pub fn num_pixels(&self) -> usize {
        self.width * self.height
    }
}

impl std::fmt::Display for FieldSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "FieldSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for FieldSize {
    fn from(size: [usize; 2]) -> Self {
        FieldSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Trait for the sample types a value field can hold.
pub trait FieldDtype: Copy + Default + num_traits::Zero + Send + Sync + 'static {}

impl FieldDtype for f32 {}
impl FieldDtype for u32 {}
impl FieldDtype for u8 {}

/// A rectangular grid of `C`-channel samples.
///
/// Samples are interleaved per pixel and stored row-major in one flat buffer,
/// so `data.len() == width * height * C` always holds.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueField<T, const C: usize> {
    size: FieldSize,
    data: Vec<T>,
}

/// A field of 32-bit floats.
pub type ValueFieldF32<const C: usize> = ValueField<f32, C>;

/// A field of full-scale 32-bit fixed-point values, `u32::MAX` being 1.0.
pub type ValueFieldI32<const C: usize> = ValueField<u32, C>;

/// A field of 8-bit values, 255 being 1.0.
pub type ValueFieldI8<const C: usize> = ValueField<u8, C>;

impl<T: FieldDtype, const C: usize> ValueField<T, C> {
    /// Create a new field from sample data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the field in pixels.
    /// * `data` - The interleaved sample data of the field.
    ///
    /// # Errors
    ///
    /// If the field type has no channels or the length of the data does not
    /// match the field size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use blerp_field::{FieldSize, ValueField};
    ///
    /// let field = ValueField::<u32, 3>::new(
    ///     FieldSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0u32; 10 * 20 * 3],
    /// ).unwrap();
    ///
    /// assert_eq!(field.width(), 10);
    /// assert_eq!(field.height(), 20);
    /// assert_eq!(field.num_channels(), 3);
    /// ```
    pub fn new(size: FieldSize, data: Vec<T>) -> Result<Self, FieldError> {
        if C == 0 {
            return Err(FieldError::NoChannels);
        }

        let expected = size.num_pixels() * C;
        if data.len() != expected {
            return Err(FieldError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self { size, data })
    }

    /// Create a new field with every sample set to `val`.
    pub fn from_size_val(size: FieldSize, val: T) -> Result<Self, FieldError> {
        let data = vec![val; size.num_pixels() * C];
        Self::new(size, data)
    }

    /// Create a new field by copying the sample data from a slice.
    pub fn from_size_slice(size: FieldSize, data: &[T]) -> Result<Self, FieldError> {
        Self::new(size, data.to_vec())
    }

    /// Create a zero-filled field.
    pub fn zeros(size: FieldSize) -> Result<Self, FieldError> {
        Self::from_size_val(size, T::zero())
    }

    /// Create a new field with every sample set to `val`, reporting allocation failure.
    ///
    /// Unlike [`ValueField::from_size_val`], which aborts the process when the
    /// allocator gives up, this returns [`FieldError::AllocationFailed`].
    pub fn try_from_size_val(size: FieldSize, val: T) -> Result<Self, FieldError> {
        let num_bytes = |len: usize| len.saturating_mul(std::mem::size_of::<T>());

        let len = size
            .width
            .checked_mul(size.height)
            .and_then(|n| n.checked_mul(C))
            .ok_or(FieldError::AllocationFailed(usize::MAX))?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| FieldError::AllocationFailed(num_bytes(len)))?;
        data.resize(len, val);

        Self::new(size, data)
    }

    /// Get the size of the field in pixels.
    pub fn size(&self) -> FieldSize {
        self.size
    }

    /// Get the width of the field in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the field in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of columns of the field.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the field.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Get the number of channels per pixel.
    pub fn num_channels(&self) -> usize {
        C
    }

    /// Get the number of pixels in the field.
    pub fn num_pixels(&self) -> usize {
        self.size.num_pixels()
    }

    /// Number of samples in one row, `width * C`.
    pub fn row_stride(&self) -> usize {
        self.size.width * C
    }

    /// Get the flat sample data.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the flat sample data mutably.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the field and return its sample data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get one row of samples, or `None` past the last row.
    pub fn row(&self, y: usize) -> Option<&[T]> {
        let stride = self.row_stride();
        self.data.get(y * stride..(y + 1) * stride)
    }

    /// Get the channels of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[T; C]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let base = (y * self.width() + x) * C;
        self.data.get(base..base + C)?.try_into().ok()
    }

    /// Get the channels of the pixel at `(x, y)` mutably.
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> Option<&mut [T; C]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let base = (y * self.width() + x) * C;
        self.data.get_mut(base..base + C)?.try_into().ok()
    }

    /// Get a single sample.
    ///
    /// # Errors
    ///
    /// If the coordinates or the channel are out of bounds, an error is returned.
    pub fn get(&self, x: usize, y: usize, ch: usize) -> Result<T, FieldError> {
        self.check_index(x, y, ch)?;
        Ok(self.data[(y * self.width() + x) * C + ch])
    }

    /// Set a single sample.
    ///
    /// # Errors
    ///
    /// If the coordinates or the channel are out of bounds, an error is returned.
    pub fn set(&mut self, x: usize, y: usize, ch: usize, val: T) -> Result<(), FieldError> {
        self.check_index(x, y, ch)?;
        let width = self.width();
        self.data[(y * width + x) * C + ch] = val;
        Ok(())
    }

    fn check_index(&self, x: usize, y: usize, ch: usize) -> Result<(), FieldError> {
        if x >= self.width() || y >= self.height() {
            return Err(FieldError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }

        if ch >= C {
            return Err(FieldError::ChannelIndexOutOfBounds(ch, C));
        }

        Ok(())
    }
}
