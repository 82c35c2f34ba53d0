//! Section geometry in document coordinates

use crate::config::FlowConfig;
use crate::viewport::{ElementRect, Viewport};

/// One section of the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionSpec {
    /// Anchor id
    pub id: &'static str,
    /// Nav label
    pub link: &'static str,
    /// Height in viewport heights
    pub height_vh: f64,
}

pub const HOME: &str = "home";
pub const FEATURES: &str = "features";
pub const FLOW: &str = "flow";
pub const USE_CASES: &str = "use-cases";
pub const ABOUT: &str = "about-us";
pub const CONTACT: &str = "contact-us";

/// Sections top to bottom. The flow height is one viewport plus its pin.
pub const SECTIONS: [SectionSpec; 6] = [
    SectionSpec { id: HOME, link: "Home", height_vh: 1.0 },
    SectionSpec { id: FEATURES, link: "Features", height_vh: 2.0 },
    SectionSpec { id: FLOW, link: "Flow", height_vh: 1.0 },
    SectionSpec { id: USE_CASES, link: "Use Cases", height_vh: 2.0 },
    SectionSpec { id: ABOUT, link: "About Us", height_vh: 1.25 },
    SectionSpec { id: CONTACT, link: "Contact Us", height_vh: 1.0 },
];

pub fn section(id: &str) -> Option<&'static SectionSpec> {
    SECTIONS.iter().find(|s| s.id == id)
}

/// Lay the sections out for `viewport`
pub fn page_layout(viewport: Viewport, flow: &FlowConfig) -> Vec<(&'static str, ElementRect)> {
    let vh = viewport.height as f64;
    let mut top = 0.0;
    SECTIONS
        .iter()
        .map(|spec| {
            let mut height = (spec.height_vh * vh).round();
            if spec.id == FLOW {
                height += (flow.pin_viewports * vh).round();
            }
            let rect = ElementRect::new(top, height);
            top += height;
            (spec.id, rect)
        })
        .collect()
}
