//! Round-trip properties over a corpus of scripts.
//!
//! These check that:
//! 1. every corpus script is valid, and so is its crunched form
//! 2. crunching, formatting and comment removal keep the tree shape
//! 3. rendering is deterministic

use jscrunch_core::{CrunchError, LayoutOptions, ScriptVersion};
use jscrunch_scripting::{
    crunch_script, format_script, format_script_with, is_valid_script, parse_script,
    parse_script_file, remove_comments, Cruncher,
};
use pretty_assertions::assert_eq;

const V: ScriptVersion = ScriptVersion::Default;

const CORPUS: &[&str] = &[
    r#"// Utility helpers
var counter = 0, names = ["a", "b", , "d"];
function add(a, b) {
    return a + b * 2 - (a - b);
}
/* block
   comment */
var obj = { name: "x", 'quoted': 1, 3: [1, 2] };
if (counter == 0) {
    counter++;
} else if (counter > 10) {
    counter = -counter;
} else
    counter += 2;
"#,
    r#"outer: for (var i = 0; i < 10; i++) {
    for (var k in obj) {
        if (k === "skip") continue outer;
        if (!k) break outer;
    }
}
do {
    i--;
} while (i > 0);
while (true) { break; }
for (;;) { break; }
"#,
    r#"function classify(v) {
    switch (typeof v) {
        case "number":
            return v > 0 ? "pos" : v < 0 ? "neg" : "zero";
        case "string":
        default:
            break;
    }
    try {
        throw new Error("bad " + v);
    } catch (e) {
        return e.message;
    } finally {
        v = null;
    }
}
"#,
    r#"var re = /ab+c/gi, s = 'it\'s', n = 0x1F + 1.5e3 + .5;
var f = function () { return this; };
var g = (function (x) { return x; })(3);
var h = new Date().getTime();
var m = new Array;
x = a ? b : c, y = (a, b);
z = a in o && !(b instanceof Object);
delete o.p;
x = a / b / /re/.source.length;
x = -(-y) + +z - ~w;
with (Math) { x = max(1, 2); }
"#,
    r#"(function () {
    var list = [];
    function push(v) { list[list.length] = v; return list; }
    ({ run: push }).run(1);
    for (var i = ("x" in window) ? 1 : 0; i < 3; ++i) push(i);
    function e() { return eval("1") + arguments.length; }
    return (1).toString() + e();
})();
"#,
];

fn shape(text: &str) -> String {
    parse_script(text, None, V).unwrap().to_string_tree()
}

#[test]
fn corpus_and_crunched_corpus_are_valid() {
    for src in CORPUS {
        assert!(is_valid_script(src, V).unwrap(), "invalid corpus entry:\n{src}");
        let crunched = crunch_script(src, None, V).unwrap();
        assert!(is_valid_script(&crunched, V).unwrap(), "invalid crunch output:\n{crunched}");
    }
}

#[test]
fn crunch_keeps_tree_shape() {
    for src in CORPUS {
        let crunched = crunch_script(src, None, V).unwrap();
        assert_eq!(shape(&crunched), shape(src));
        assert_eq!(crunch_script(&crunched, None, V).unwrap(), crunched);
    }
}

#[test]
fn remove_comments_changes_only_trivia() {
    for src in CORPUS {
        let stripped = remove_comments(src, V).unwrap();
        assert!(!stripped.contains("//") && !stripped.contains("/*"));
        assert_eq!(shape(&stripped), shape(src));

        let lexical = Cruncher::default().remove_comments_with(src, false).unwrap();
        assert_eq!(shape(&lexical), shape(src));
    }
}

#[test]
fn format_is_deterministic_and_equivalent() {
    let layout = LayoutOptions::new(2, 3, 1, true, true);
    for src in CORPUS {
        let first = format_script(src, V).unwrap();
        assert_eq!(format_script(src, V).unwrap(), first);
        assert_eq!(shape(&first), shape(src));

        let custom = format_script_with(src, layout, V).unwrap();
        assert_eq!(
            crunch_script(&custom, None, V).unwrap(),
            crunch_script(src, None, V).unwrap()
        );
    }
}

#[test]
fn facade_is_usable_across_threads() {
    std::thread::scope(|scope| {
        let handles: Vec<_> = CORPUS
            .iter()
            .map(|src| scope.spawn(move || crunch_script(src, None, V).unwrap()))
            .collect();
        for (handle, src) in handles.into_iter().zip(CORPUS) {
            assert_eq!(handle.join().unwrap(), crunch_script(src, None, V).unwrap());
        }
    });
}

#[test]
fn scenario_remove_comments() {
    let out = remove_comments("var a = 1;\n// note\nvar b = 2;", V).unwrap();
    assert!(out.contains("var a = 1;"));
    assert!(out.contains("var b = 2;"));
    assert!(!out.contains("note"));
}

#[test]
fn scenario_crunch_function() {
    let out = crunch_script("function foo( a , b ) {\n return a+b;\n}", None, V).unwrap();
    assert_eq!(out, "function foo(a,b){return a+b}");
    assert!(is_valid_script(&out, V).unwrap());
}

#[test]
fn scenario_invalid_script() {
    assert!(!is_valid_script("var x = ;", V).unwrap());
}

#[test]
fn scenario_version_resolution() {
    assert_eq!(ScriptVersion::from_f64(1.3).unwrap(), ScriptVersion::V1_3);
    let err = ScriptVersion::from_f64(9.9).unwrap_err();
    assert!(matches!(err, CrunchError::UnsupportedVersion(_)));
    assert!(!err.is_syntax());
}

#[test]
fn scenario_missing_file() {
    let err = parse_script_file("/does/not/exist.js", V).unwrap_err();
    assert!(matches!(err, CrunchError::Io { .. }));
}

#[test]
fn dialects_gate_syntax() {
    assert!(!is_valid_script("x = /re/;", ScriptVersion::V1_1).unwrap());
    assert!(is_valid_script("x = /re/;", ScriptVersion::V1_2).unwrap());
    assert!(is_valid_script("var try = 1;", ScriptVersion::V1_3).unwrap());
    assert!(!is_valid_script("try { a(); } catch (e) {}", ScriptVersion::V1_3).unwrap());
    assert!(!is_valid_script("try { a(); } catch (e if e) {}", ScriptVersion::V1_4).unwrap());
    assert!(is_valid_script("try { a(); } catch (e if e) {}", ScriptVersion::V1_5).unwrap());
}
