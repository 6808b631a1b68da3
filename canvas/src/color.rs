///
/// Representation of a colour
///
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub enum Color {
    /// Red, green, blue and alpha components, each in the range 0-1
    Rgba(f32, f32, f32, f32),

    /// A shade of grey (0 is black, 1 is white) with an alpha value
    Gray(f32, f32),
}

impl Color {
    pub const BLACK: Color = Color::Rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::Rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::Rgba(0.0, 0.0, 0.0, 0.0);

    ///
    /// Returns the components of this colour as RGBA values
    ///
    pub fn to_rgba_components(&self) -> (f32, f32, f32, f32) {
        match self {
            Color::Rgba(r, g, b, a) => (*r, *g, *b, *a),
            Color::Gray(l, a)       => (*l, *l, *l, *a),
        }
    }

    ///
    /// Returns the alpha value of this colour
    ///
    pub fn alpha_component(&self) -> f32 {
        self.to_rgba_components().3
    }

    ///
    /// True if this colour is a shade of grey
    ///
    pub fn is_gray(&self) -> bool {
        let (r, g, b, _) = self.to_rgba_components();
        r == g && g == b
    }

    ///
    /// Returns a copy of this colour with a different alpha value
    ///
    pub fn with_alpha(&self, new_alpha: f32) -> Color {
        match self {
            Color::Rgba(r, g, b, _) => Color::Rgba(*r, *g, *b, new_alpha),
            Color::Gray(l, _)       => Color::Gray(*l, new_alpha),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gray_has_equal_components() {
        assert!(Color::Gray(0.5, 1.0).to_rgba_components() == (0.5, 0.5, 0.5, 1.0));
        assert!(Color::Gray(0.5, 1.0).is_gray());
        assert!(!Color::Rgba(1.0, 0.0, 0.0, 1.0).is_gray());
    }

    #[test]
    fn change_alpha() {
        assert!(Color::BLACK.with_alpha(0.5).alpha_component() == 0.5);
    }
}
