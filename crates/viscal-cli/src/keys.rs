//! Key scripts: literal characters plus `<Name>` for everything else.
//!
//! `<C-x>` is Ctrl-x, `<Tab>`, `<Esc>`, `<CR>` (or `<Enter>`), `<BS>`, `<Left>`,
//! `<Right>`, `<F1>`..`<F12>`, `<Space>`, and `<lt>` for a literal `<`. Line
//! breaks are ignored so scripts can span lines.

use anyhow::{bail, Result};
use viscal_engine::Key;

pub fn parse_keys(script: &str) -> Result<Vec<Key>> {
    let mut keys = Vec::new();
    let mut chars = script.chars();
    while let Some(c) = chars.next() {
        match c {
            '\n' | '\r' => {}
            '<' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('>') => break,
                        Some(ch) => name.push(ch),
                        None => bail!("Unterminated key name: <{}", name),
                    }
                }
                keys.push(named_key(&name)?);
            }
            c => keys.push(Key::Char(c)),
        }
    }
    Ok(keys)
}

fn named_key(name: &str) -> Result<Key> {
    let key = match name {
        "Tab" => Key::Tab,
        "Esc" => Key::Escape,
        "CR" | "Enter" => Key::Enter,
        "BS" => Key::Backspace,
        "Left" => Key::Left,
        "Right" => Key::Right,
        "Space" => Key::Char(' '),
        "lt" => Key::Char('<'),
        _ => {
            if let Some(rest) = name.strip_prefix("C-") {
                let mut it = rest.chars();
                if let (Some(c), None) = (it.next(), it.next()) {
                    return Ok(Key::Ctrl(c));
                }
            }
            if let Some(n) = name
                .strip_prefix('F')
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| (1..=12).contains(n))
            {
                return Ok(Key::F(n));
            }
            bail!("Unknown key name: <{}>", name)
        }
    };
    Ok(key)
}
