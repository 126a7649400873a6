
/// Iteration order of a descriptor.
///
/// The order says which axis varies fastest when the logical indices
/// `0..length` are walked: the last axis under `RowMajor` (also called "C"
/// order, after the C programming language), the first axis under
/// `ColumnMajor` ("F", after Fortran). Default stride synthesis, the
/// element-wise stride and the index↔coordinate conversions are all
/// relative to it.
///
/// A descriptor persists its order as a single byte at the tail of the
/// packed image, 99 (`'c'`) or 102 (`'f'`);
/// [`to_byte`](Order::to_byte) and [`from_byte`](Order::from_byte) are that
/// codec. The byte 97 (`'a'`) occasionally shows up from order deduction
/// over strides that are contiguous both ways; it is accepted on decode as
/// row major and never written back.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    /// Row major or "C" order: the last axis varies fastest.
    RowMajor,
    /// Column major or "F" order: the first axis varies fastest.
    ColumnMajor,
}

impl Order {
    /// "C" is an alias for row major ordering
    pub const C: Order = Order::RowMajor;

    /// "F" (for Fortran) is an alias for column major ordering
    pub const F: Order = Order::ColumnMajor;

    /// The opposite order. Reversing a descriptor's axes turns one layout
    /// into the other, which is how
    /// [`transpose`](crate::ShapeDescriptor::transpose) flips its byte.
    #[inline]
    pub fn transpose(self) -> Order {
        match self {
            Order::RowMajor => Order::ColumnMajor,
            Order::ColumnMajor => Order::RowMajor,
        }
    }

    /// The order byte persisted in packed descriptors: 99 (`'c'`) or 102 (`'f'`).
    #[inline]
    pub fn to_byte(self) -> i64 {
        match self {
            Order::RowMajor => 99,
            Order::ColumnMajor => 102,
        }
    }

    /// Decode an order byte; `None` for anything that is not 99, 102 or
    /// the transient 97.
    #[inline]
    pub fn from_byte(byte: i64) -> Option<Order> {
        match byte {
            99 | 97 => Some(Order::RowMajor),
            102 => Some(Order::ColumnMajor),
            _ => None,
        }
    }
}
