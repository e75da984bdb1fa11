//! Compile-time constants and the user-settable knobs parsed from argv.

use nerdwm_x11::xcb;

/// Number of virtual workspaces. Windows are indexed 0..WORKSPACE_COUNT.
pub const WORKSPACE_COUNT: usize = 10;

/// Sentinel `_NET_WM_DESKTOP` value meaning "visible on every workspace".
pub const NET_WM_FIXED: u32 = 0xFFFF_FFFF;

/// Sentinel meaning "no workspace hint was found at all" (distinct from a
/// valid workspace index or the fixed sentinel above).
pub const NET_WM_NO_HINT: u32 = 0xFFFF_FFFE;

/// Border width in pixels for a normal, non-maximized window.
pub const BORDER_WIDTH: u16 = 1;

/// Pixel step for keyboard-driven move/resize when no size hint applies.
pub const MOVE_STEP: i16 = 27;

/// Modifier mask used for all window-manager key bindings.
pub const MODIFIER_MASK: u16 = xcb::MOD_MASK_4 as u16;

/// Modifier mask used for the mouse move/resize/raise bindings.
pub const MOUSE_MODIFIER_MASK: u16 = xcb::MOD_MASK_4 as u16;

pub const DEFAULT_TERMINAL: &str = "xterm";
pub const DEFAULT_FOCUS_COLOR: &str = "red";
pub const DEFAULT_UNFOCUS_COLOR: &str = "black";
pub const DEFAULT_FIXED_COLOR: &str = "orange";

/// The knobs settable from the command line (`mcwm`'s `-b -t -f -u -x`).
#[derive(Debug, Clone)]
pub struct Config {
    pub borders: bool,
    pub terminal: String,
    pub focus_color: String,
    pub unfocus_color: String,
    pub fixed_color: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            borders: true,
            terminal: DEFAULT_TERMINAL.to_string(),
            focus_color: DEFAULT_FOCUS_COLOR.to_string(),
            unfocus_color: DEFAULT_UNFOCUS_COLOR.to_string(),
            fixed_color: DEFAULT_FIXED_COLOR.to_string(),
        }
    }
}

/// What `parse_args` decided to do with a bad or help-requesting argument
/// list. `nerdwm -b -t -f -u -x` has no library for option parsing in this
/// crate's dependency stack, so this is a small hand-rolled getopt-alike,
/// the same way the reference window manager parses argv itself.
pub enum ParsedArgs {
    Run(Config),
    Usage,
}

pub const USAGE: &str = "nerdwm: Usage: nerdwm [-b] [-t terminal-program] [-f colour] [-u colour] [-x colour]\n\
  -b means draw no borders\n\
  -t path sets the terminal command run on modifier+Return\n\
  -f colour sets the focused window border colour\n\
  -u colour sets the unfocused window border colour\n\
  -x colour sets the fixed window border colour\n";

pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> ParsedArgs {
    let mut config = Config::default();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-b" => config.borders = false,
            "-t" => match iter.next() {
                Some(v) => config.terminal = v,
                None => return ParsedArgs::Usage,
            },
            "-f" => match iter.next() {
                Some(v) => config.focus_color = v,
                None => return ParsedArgs::Usage,
            },
            "-u" => match iter.next() {
                Some(v) => config.unfocus_color = v,
                None => return ParsedArgs::Usage,
            },
            "-x" => match iter.next() {
                Some(v) => config.fixed_color = v,
                None => return ParsedArgs::Usage,
            },
            _ => return ParsedArgs::Usage,
        }
    }

    ParsedArgs::Run(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_borders() {
        let config = Config::default();
        assert!(config.borders);
        assert_eq!(config.terminal, DEFAULT_TERMINAL);
    }

    #[test]
    fn parses_known_flags() {
        let args = vec!["-b", "-t", "urxvt", "-f", "blue"]
            .into_iter()
            .map(String::from);
        match parse_args(args) {
            ParsedArgs::Run(config) => {
                assert!(!config.borders);
                assert_eq!(config.terminal, "urxvt");
                assert_eq!(config.focus_color, "blue");
            }
            ParsedArgs::Usage => panic!("expected Run"),
        }
    }

    #[test]
    fn unknown_flag_yields_usage() {
        match parse_args(vec!["-z".to_string()]) {
            ParsedArgs::Usage => {}
            ParsedArgs::Run(_) => panic!("expected Usage"),
        }
    }

    #[test]
    fn missing_value_yields_usage() {
        match parse_args(vec!["-t".to_string()]) {
            ParsedArgs::Usage => {}
            ParsedArgs::Run(_) => panic!("expected Usage"),
        }
    }
}
