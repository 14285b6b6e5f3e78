//! APL glyph table.
//!
//! Backtick prefix keys follow the common APL keyboard layout: `` `i `` is
//! `⍳`, `` `r `` is `⍴`, `` `` `` is `⋄`. The same table backs the symbol
//! search pane.

/// One glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    /// The glyph itself.
    pub glyph: char,
    /// Key pressed after the backtick.
    pub key: char,
    /// Descriptive name used for searching.
    pub name: &'static str,
}

const fn sym(key: char, glyph: char, name: &'static str) -> Symbol {
    Symbol { glyph, key, name }
}

/// Every glyph reachable with the backtick prefix.
pub const SYMBOLS: &[Symbol] = &[
    sym('`', '⋄', "diamond statement separator"),
    sym('1', '¨', "each diaeresis"),
    sym('2', '¯', "high minus negative"),
    sym('3', '<', "less than"),
    sym('4', '≤', "less than or equal"),
    sym('5', '=', "equal"),
    sym('6', '≥', "greater than or equal"),
    sym('7', '>', "greater than"),
    sym('8', '≠', "not equal unique mask"),
    sym('9', '∨', "or gcd"),
    sym('0', '∧', "and lcm"),
    sym('-', '×', "times signum"),
    sym('=', '÷', "divide reciprocal"),
    sym('q', '?', "roll deal"),
    sym('w', '⍵', "omega right argument"),
    sym('e', '∊', "epsilon membership enlist"),
    sym('r', '⍴', "rho reshape shape"),
    sym('t', '~', "tilde not without"),
    sym('y', '↑', "up arrow take mix"),
    sym('u', '↓', "down arrow drop split"),
    sym('i', '⍳', "iota index generator"),
    sym('o', '○', "circle pi times"),
    sym('p', '*', "star power exponential"),
    sym('[', '←', "left arrow assign"),
    sym(']', '→', "right arrow branch"),
    sym('a', '⍺', "alpha left argument"),
    sym('s', '⌈', "upstile ceiling maximum"),
    sym('d', '⌊', "downstile floor minimum"),
    sym('f', '_', "underscore"),
    sym('g', '∇', "del recursion"),
    sym('h', '∆', "delta"),
    sym('j', '∘', "jot compose"),
    sym('k', '\'', "quote"),
    sym('l', '⎕', "quad system name"),
    sym(';', '⍎', "execute hydrant"),
    sym('\'', '⍕', "format thorn"),
    sym('z', '⊂', "left shoe enclose partitioned"),
    sym('x', '⊃', "right shoe disclose first pick"),
    sym('c', '∩', "cap intersection"),
    sym('v', '∪', "cup union unique"),
    sym('b', '⊥', "up tack decode"),
    sym('n', '⊤', "down tack encode"),
    sym('m', '|', "stile residue magnitude"),
    sym(',', '⍝', "lamp comment"),
    sym('.', '⍀', "backslash bar expand first"),
    sym('/', '⌿', "slash bar replicate first"),
    sym('!', '⌶', "i-beam"),
    sym('@', '⍫', "del tilde"),
    sym('#', '⍒', "grade down"),
    sym('$', '⍋', "grade up"),
    sym('%', '⌽', "circle stile reverse rotate"),
    sym('^', '⍉', "transpose"),
    sym('&', '⊖', "circle bar reverse first"),
    sym('*', '⍟', "log"),
    sym('(', '⍱', "nor"),
    sym(')', '⍲', "nand"),
    sym('_', '!', "factorial binomial"),
    sym('+', '⌹', "domino matrix inverse divide"),
    sym('E', '⍷', "find"),
    sym('T', '⍨', "tilde diaeresis commute selfie"),
    sym('I', '⍸', "iota underbar where interval index"),
    sym('O', '⍥', "over"),
    sym('P', '⍣', "power operator"),
    sym('{', '⍞', "quote quad character input"),
    sym('}', '⍬', "zilde empty numeric vector"),
    sym('J', '⍤', "rank atop"),
    sym('K', '⌸', "key"),
    sym('L', '⌷', "squad index"),
    sym(':', '≡', "match depth"),
    sym('"', '≢', "not match tally"),
    sym('Z', '⊆', "nest partition"),
    sym('<', '⍪', "comma bar table catenate first"),
    sym('>', '⍙', "delta underbar"),
    sym('?', '⍠', "variant"),
    sym('~', '⌺', "stencil"),
    sym('\\', '⊢', "right tack same"),
    sym('|', '⊣', "left tack"),
];

/// Glyph for the key pressed after a backtick.
pub fn lookup(key: char) -> Option<char> {
    SYMBOLS.iter().find(|s| s.key == key).map(|s| s.glyph)
}

/// Symbols whose name or glyph contains `query` (case-insensitive).
pub fn search(query: &str) -> Vec<&'static Symbol> {
    let query = query.trim().to_lowercase();
    SYMBOLS
        .iter()
        .filter(|s| query.is_empty() || s.name.contains(&query) || query.contains(s.glyph))
        .collect()
}
