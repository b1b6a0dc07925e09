// 过程宏展开结果的编译期检查
#[test]
fn ui_pass() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/value_object_basic.rs");
    t.pass("tests/ui/entity_id_basic.rs");
    t.pass("tests/ui/entity_basic.rs");
    t.pass("tests/ui/canonical_enum_basic.rs");
}
