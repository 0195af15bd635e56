use zarrs_fixtures::{fixtures::create_native, node::Node, storage::store::FilesystemStore};

#[test]
fn native_hierarchy_tree() {
    let dir = tempfile::tempdir().unwrap();
    let path = create_native(&dir.path().join("zarr-tree"), true).unwrap();
    let store = FilesystemStore::new(&path).unwrap().sorted();
    let node = Node::open(&store, "/").unwrap();
    let tree = node.hierarchy_tree();
    println!("{tree}");
    assert_eq!(
        tree,
        "/
  arrays
    floats
      float32 [2, 3] <f4
      float64 [2, 3] <f8
    ints
      int16 [2, 3] <i2
      int32 [2, 3] <i4
      int64 [2, 3] <i8
      int8 [2, 3] |i1
      uint16 [2, 3] <u2
      uint32 [2, 3] <u4
      uint64 [2, 3] <u8
      uint8 [2, 3] |u1
    misc
      bytes [] |S11
      string [] <U11
  scalars
    fill_pi [] <f8
    int [] <i8
    pi [] <f8
    uint8 [] |u1
"
    );
}
