use defmac::defmac;

use ndshape::{index, offsets, DataType, Order, ShapeDescriptor};

defmac!(cdesc shape => ShapeDescriptor::row_major(&shape, DataType::Float32).unwrap());
defmac!(fdesc shape => ShapeDescriptor::column_major(&shape, DataType::Float32).unwrap());

#[test]
fn cube_layouts() {
    let c = cdesc!([2, 3, 4]);
    assert_eq!(c.strides(), &[12, 4, 1]);
    assert_eq!(c.ews(), 1);
    assert_eq!(c.length(), 24);
    assert_eq!(c.order(), Order::C);
    assert_eq!(&index::index_to_coords(c.shape(), 5, Order::C)[..], &[0, 1, 1]);

    let f = fdesc!([2, 3, 4]);
    assert_eq!(f.strides(), &[1, 2, 6]);
    assert_eq!(f.ews(), 1);
    assert_eq!(f.length(), 24);
    assert_eq!(f.order(), Order::F);
    assert_eq!(&index::index_to_coords(f.shape(), 5, Order::F)[..], &[1, 2, 0]);
}

#[test]
fn permute_then_reshape_roundtrip() {
    // a permuted view usually cannot reshape without a copy, but the
    // element mapping of a compatible reshape always agrees with the source
    let mut d = cdesc!([2, 3, 4]);
    d.permute_axes(&[2, 0, 1]).unwrap();
    assert_eq!(d.shape(), &[4, 2, 3]);
    assert!(d.reshaped(&[24]).is_none());

    let d = cdesc!([2, 3, 4]);
    let r = d.reshaped(&[6, 4]).unwrap();
    assert_eq!(r.strides(), &[4, 1]);
    for i in 0..24 {
        assert_eq!(d.offset_of_index(i), r.offset_of_index(i));
    }
}

#[test]
fn transpose_matches_fortran_view() {
    let mut t = cdesc!([4, 3, 2]);
    t.transpose();
    let f = fdesc!([2, 3, 4]);
    // a transposed c array and an f array of the reversed shape describe
    // the same buffer walk
    assert_eq!(t.shape(), f.shape());
    assert_eq!(t.strides(), f.strides());
    assert_eq!(t.order(), f.order());
}

#[test]
fn packed_boundary_roundtrip() {
    let mut d = fdesc!([3, 1, 5]);
    d.permute_axes(&[2, 1, 0]).unwrap();
    let packed = d.to_packed();
    assert_eq!(packed.len(), d.packed_len());
    let back = ShapeDescriptor::from_packed(&packed).unwrap();
    assert_eq!(back, d);
    assert!(back.same_shape(&d));
    assert!(back.same_shape_and_type(&d));
}

#[test]
fn npy_entry_point() {
    let d = ShapeDescriptor::from_npy(&[6, 2], true).unwrap();
    assert_eq!(d.order(), Order::F);
    assert_eq!(d.strides(), &[1, 6]);
    assert_eq!(d.extra().data_type(), Some(DataType::Float32));

    let d = ShapeDescriptor::from_npy(&[6, 2], false).unwrap();
    assert_eq!(d.order(), Order::C);
    assert_eq!(d.strides(), &[2, 1]);
}

#[test]
fn empty_arrays() {
    let zero_dim = cdesc!([2, 0, 3]);
    assert_eq!(zero_dim.length(), 0);
    assert!(offsets::offsets_for(&zero_dim, Order::C).is_empty());

    let flagged = ShapeDescriptor::empty_scalar(DataType::Int8);
    assert_eq!(flagged.length(), 0);
    assert!(flagged.is_empty());
    let back = ShapeDescriptor::from_packed(&flagged.to_packed()).unwrap();
    assert!(back.is_empty());
}

#[test]
fn update_strides_after_mutation() {
    let mut d = cdesc!([4, 5]);
    d.transpose();
    assert_eq!(d.order(), Order::F);
    d.update_strides(Order::C);
    assert_eq!(d.strides(), &[4, 1]);
    assert_eq!(d.ews(), 1);
    assert!(d.has_default_strides());
}

#[test]
fn offset_tables_for_kernels() {
    use itertools::Itertools;

    // two operands of unlike layout walked together in c order
    let x = cdesc!([2, 3]);
    let mut y = cdesc!([3, 2]);
    y.transpose();
    let (xo, yo) = offsets::offsets_for_pair(&x, &y, Order::C);
    assert!(xo.is_none());
    let yo = yo.unwrap();
    // the y table must enumerate every element exactly once
    assert_eq!(yo.iter().copied().sorted().collect::<Vec<_>>(), (0..6).collect::<Vec<_>>());
    for (i, &off) in yo.iter().enumerate() {
        let coords = index::index_to_coords(y.shape(), i as i64, Order::C);
        assert_eq!(off, y.offset_at(&coords));
    }
}
