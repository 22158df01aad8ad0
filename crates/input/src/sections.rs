//! Page sections and the body each one shows. Bodies are named here and resolved
//! to scene indices by the body registry.

use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub id: &'static str,
    /// Registry name of the body shown while this section is active.
    pub body: &'static str,
}

pub const SECTIONS: [Section; 5] = [
    Section { id: "hero", body: "earth" },
    Section { id: "skills", body: "mars" },
    Section { id: "projects", body: "jupiter" },
    Section { id: "about", body: "saturn" },
    Section { id: "contact", body: "moon" },
];

/// Number keys 1-5 jump to the matching section.
pub fn section_for_key(key: KeyCode) -> Option<usize> {
    let index = match key {
        KeyCode::Digit1 | KeyCode::Numpad1 => 0,
        KeyCode::Digit2 | KeyCode::Numpad2 => 1,
        KeyCode::Digit3 | KeyCode::Numpad3 => 2,
        KeyCode::Digit4 | KeyCode::Numpad4 => 3,
        KeyCode::Digit5 | KeyCode::Numpad5 => 4,
        _ => return None,
    };
    (index < SECTIONS.len()).then_some(index)
}

/// Page offset at which section `index` sits, with sections spread evenly so that
/// the first is at the top and the last at the bottom.
pub fn section_offset(index: usize, page_height: f32) -> f32 {
    if SECTIONS.len() < 2 {
        return 0.0;
    }
    let index = index.min(SECTIONS.len() - 1);
    page_height * index as f32 / (SECTIONS.len() - 1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_section_names_a_distinct_body() {
        for (i, a) in SECTIONS.iter().enumerate() {
            for b in &SECTIONS[i + 1..] {
                assert_ne!(a.id, b.id);
                assert_ne!(a.body, b.body);
            }
        }
        assert_eq!(SECTIONS[3].body, "saturn");
    }

    #[test]
    fn digit_keys_select_sections() {
        assert_eq!(section_for_key(KeyCode::Digit1), Some(0));
        assert_eq!(section_for_key(KeyCode::Numpad5), Some(4));
        assert_eq!(section_for_key(KeyCode::Digit6), None);
        assert_eq!(section_for_key(KeyCode::KeyA), None);
    }

    #[test]
    fn offsets_span_the_page() {
        assert_eq!(section_offset(0, 4000.0), 0.0);
        assert_eq!(section_offset(2, 4000.0), 2000.0);
        assert_eq!(section_offset(4, 4000.0), 4000.0);
        assert_eq!(section_offset(9, 4000.0), 4000.0);
    }
}
