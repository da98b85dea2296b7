use ratatui::style::Color;

/// A named color palette. All UI colors come from here so themes stay consistent.
pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub muted: Color,
  pub accent: Color,
  pub border: Color,
  pub status: Color,
  pub error: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub const THEMES: [Theme; 3] = [
  Theme {
    name: "pastel",
    bg: Color::Rgb(40, 42, 54),
    fg: Color::Rgb(233, 233, 241),
    muted: Color::Rgb(130, 137, 151),
    accent: Color::Rgb(255, 184, 188),
    border: Color::Rgb(84, 88, 104),
    status: Color::Rgb(180, 210, 186),
    error: Color::Rgb(240, 135, 132),
    highlight_fg: Color::Rgb(40, 42, 54),
    highlight_bg: Color::Rgb(255, 184, 188),
    stripe_bg: Color::Rgb(46, 48, 61),
    key_fg: Color::Rgb(40, 42, 54),
    key_bg: Color::Rgb(130, 137, 151),
  },
  Theme {
    name: "midnight",
    bg: Color::Rgb(18, 20, 28),
    fg: Color::Rgb(205, 214, 230),
    muted: Color::Rgb(96, 106, 128),
    accent: Color::Rgb(122, 162, 247),
    border: Color::Rgb(56, 62, 80),
    status: Color::Rgb(158, 206, 106),
    error: Color::Rgb(247, 118, 142),
    highlight_fg: Color::Rgb(18, 20, 28),
    highlight_bg: Color::Rgb(122, 162, 247),
    stripe_bg: Color::Rgb(24, 27, 38),
    key_fg: Color::Rgb(18, 20, 28),
    key_bg: Color::Rgb(96, 106, 128),
  },
  Theme {
    name: "paper",
    bg: Color::Rgb(247, 243, 233),
    fg: Color::Rgb(56, 52, 46),
    muted: Color::Rgb(146, 138, 124),
    accent: Color::Rgb(186, 96, 66),
    border: Color::Rgb(204, 196, 180),
    status: Color::Rgb(94, 128, 86),
    error: Color::Rgb(178, 62, 56),
    highlight_fg: Color::Rgb(247, 243, 233),
    highlight_bg: Color::Rgb(186, 96, 66),
    stripe_bg: Color::Rgb(238, 232, 219),
    key_fg: Color::Rgb(247, 243, 233),
    key_bg: Color::Rgb(146, 138, 124),
  },
];
