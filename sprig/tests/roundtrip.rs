//! Parse/serialize roundtrip tests using datatest-stable.
//!
//! Each test case is a file in `tests/roundtrip-cases/` holding canonical
//! body markup: attributes double-quoted, end tags explicit, `<` `>` `&`
//! escaped in text. The test verifies:
//!
//! - `serialize(parse_fragment(html)) == html`
//! - a deep clone of the tree serializes to the same string

mod common;

use sprig::{SerializeOptions, parse_fragment, serialize};
use std::path::Path;

fn run_roundtrip_test(path: &Path) -> datatest_stable::Result<()> {
    common::setup();

    let content = std::fs::read_to_string(path)?;
    let html = content.trim_end();

    let mut dom = parse_fragment(html);
    let result = dom.to_html();
    if result != html {
        return Err(format!("Roundtrip failed!\nInput:  {html}\nOutput: {result}").into());
    }

    let copy = dom.clone_node(dom.root);
    let cloned = serialize(&dom, copy, &SerializeOptions::default());
    if cloned != result {
        return Err(format!("Clone differs!\nOriginal: {result}\nClone:    {cloned}").into());
    }

    // the source tree is untouched by cloning
    if dom.to_html() != result {
        return Err("clone_node modified the source tree".into());
    }

    Ok(())
}

datatest_stable::harness! {
    { test = run_roundtrip_test, root = "tests/roundtrip-cases", pattern = r".*\.html$" },
}
