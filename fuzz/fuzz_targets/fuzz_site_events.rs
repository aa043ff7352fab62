#![no_main]

use std::time::Duration;

use ampui_core::config::SiteConfig;
use ampui_core::dom::ElementTree;
use ampui_core::event::HostEvent;
use ampui_core::location::Location;
use ampui_core::Instant;
use ampui_harness::standard_site;
use ampui_widgets::Site;
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Step {
    Click(u8),
    Key(String),
    Escape,
    Resize { width: u16 },
    Advance(u16),
    OpenModal(bool),
}

fuzz_target!(|steps: Vec<Step>| {
    let fixture = standard_site();
    let doc = &fixture.doc;
    let mut site = Site::new(SiteConfig::default());
    site.initialize(doc, &Location::path("/docs"));

    let nodes = doc.all_elements();
    let mut now = Instant::now();
    for step in steps.into_iter().take(256) {
        match step {
            Step::Click(idx) => {
                let node = nodes[usize::from(idx) % nodes.len()];
                site.dispatch(doc, &HostEvent::click(node), now);
            }
            Step::Key(key) => {
                site.dispatch(doc, &HostEvent::key(&key), now);
            }
            Step::Escape => {
                site.dispatch(doc, &HostEvent::key("Escape"), now);
            }
            Step::Resize { width } => {
                doc.set_viewport_width(f64::from(width));
                site.dispatch(doc, &HostEvent::Resize, now);
            }
            Step::Advance(ms) => {
                now += Duration::from_millis(u64::from(ms));
                site.poll_timers(doc, now);
            }
            Step::OpenModal(signup) => {
                site.open_modal(doc, if signup { "signup" } else { "newsletter" });
            }
        }

        // The active record always names a visible modal.
        if let Some(id) = site.active_modal() {
            assert!(site.modals().is_open(doc, id));
        }
        // The resize timer never outlives its window.
        if let Some(deadline) = site.next_deadline() {
            assert!(deadline <= now + Duration::from_millis(250));
        }
    }
});
