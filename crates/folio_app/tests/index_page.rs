//! End-to-end behavior of the landing page on a manual clock

use folio_animation::{AnimationScheduler, EntranceTrail, OffsetRange, TrailConfig};
use folio_app::markup::Element;
use folio_app::prelude::*;
use std::rc::Rc;

/// Deterministic unit samples from a small linear congruential generator
fn lcg() -> impl FnMut() -> f32 {
    let mut state: u32 = 12_345;
    move || {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (state >> 8) as f32 / (1u32 << 24) as f32
    }
}

fn email_entry(page: &IndexPage) -> Element {
    let tree = page.render();
    tree.find_by_class("App-links")
        .and_then(|links| links.child_elements().nth(3))
        .cloned()
        .expect("email entry is the fourth link")
}

#[test]
fn test_email_reveal_end_to_end() {
    let runtime = PageRuntime::manual();
    let config = SiteConfig::default();
    let page = IndexPage::mount(&runtime, &config, &mut RandomOffsets::seeded(42));
    runtime.advance(0);

    let entry = email_entry(&page);
    assert!(entry.find_by_class("App-link").is_some());
    assert_eq!(entry.text_content(), "EMAIL");

    assert!(page.click_email());
    runtime.advance(100);

    let entry = email_entry(&page);
    assert_eq!(
        entry.find_by_class("App-email-left").unwrap().text_content(),
        "mmczaplinski"
    );
    assert_eq!(
        entry.find_by_class("App-email-right").unwrap().text_content(),
        "@gmail.com"
    );
    assert!(entry.find_by_class("App-email-merged").is_none());

    runtime.advance(1400);

    let entry = email_entry(&page);
    let merged = entry.find_by_class("App-email-merged").unwrap();
    assert_eq!(merged.text_content(), "mmczaplinski@gmail.com");
    assert!(entry.find_by_class("App-email-left").is_none());
}

#[test]
fn test_email_timeline_boundaries() {
    let runtime = PageRuntime::manual();
    let page = IndexPage::mount(&runtime, &SiteConfig::default(), &mut RandomOffsets::seeded(1));

    page.click_email();
    assert_eq!(page.email_state().stage(), RevealStage::Visible);

    runtime.advance(99);
    assert!(!page.email_state().splitting);

    runtime.advance(1);
    assert!(page.email_state().splitting);

    // Re-entry mid-sequence keeps the first schedule
    assert!(!page.click_email());

    runtime.advance(1399);
    assert!(!page.email_state().merged);

    runtime.advance(1);
    assert!(page.email_state().merged);
}

#[test]
fn test_click_off_frame_boundary_merges_on_time() {
    let runtime = PageRuntime::manual();
    let page = IndexPage::mount(&runtime, &SiteConfig::default(), &mut RandomOffsets::seeded(8));

    // Frames run every 16ms from here, so the split lands late at 117ms
    runtime.advance(5);
    assert!(page.click_email());

    runtime.advance(1499);
    assert!(page.email_state().splitting);
    assert!(!page.email_state().merged);

    runtime.advance(1);
    assert_eq!(runtime.now_ms(), 1505);
    assert!(page.email_state().merged);
}

#[test]
fn test_clock_jump_fires_both_stages_in_one_run() {
    let clock = Rc::new(ManualClock::starting_at(250));
    let runtime = PageRuntime::new(clock.clone());
    let page = IndexPage::mount(&runtime, &SiteConfig::default(), &mut RandomOffsets::seeded(2));

    page.click_email();
    clock.set(250 + 1500);
    runtime.timers().run_due();

    let state = page.email_state();
    assert!(state.splitting);
    assert!(state.merged);
    // Only the cube's rotate-once timer is left
    assert_eq!(runtime.timers().next_due_ms(), Some(250 + 2100));
}

#[test]
fn test_unmount_mid_sequence_discards_pending_stages() {
    let runtime = PageRuntime::manual();
    let mut page = IndexPage::mount(&runtime, &SiteConfig::default(), &mut RandomOffsets::seeded(3));

    page.click_email();
    runtime.advance(100);
    page.unmount();

    runtime.advance(5000);
    assert_eq!(page.email_state().stage(), RevealStage::Splitting);
    assert_eq!(runtime.timers().pending_count(), 0);
}

#[test]
fn test_trail_of_six_scatters_and_settles() {
    let scheduler = AnimationScheduler::new();
    let mut source = lcg();
    let trail = EntranceTrail::new(scheduler.handle(), 6, TrailConfig::default(), &mut source);
    let range = OffsetRange::default();

    for item in trail.items() {
        assert!(range.contains_magnitude(item.offset.x));
        assert!(range.contains_magnitude(item.offset.y));
        assert_eq!(item.opacity, 0.0);
    }

    trail.activate();
    for _ in 0..60 * 60 {
        scheduler.tick(1.0 / 60.0);
    }

    for item in trail.items() {
        assert_eq!(item.offset.x, 0.0);
        assert_eq!(item.offset.y, 0.0);
        assert_eq!(item.opacity, 1.0);
    }
}

#[test]
fn test_pointer_after_unmount_has_no_effect() {
    let runtime = PageRuntime::manual();
    let mut page = IndexPage::mount(&runtime, &SiteConfig::default(), &mut RandomOffsets::seeded(5));

    runtime.pointer_move(0.0, 400.0);
    runtime.run_until_idle(30_000);
    let before = page.render_html();

    page.unmount();
    assert_eq!(runtime.pointer_move(0.0, 800.0), 0);
    runtime.run_until_idle(30_000);

    assert_eq!(page.render_html(), before);
}

#[test]
fn test_remount_does_not_leak_listeners() {
    let runtime = PageRuntime::manual();
    let config = SiteConfig::default();

    for seed in 0..3 {
        let page = IndexPage::mount(&runtime, &config, &mut RandomOffsets::seeded(seed));
        assert_eq!(runtime.pointer().listener_count(), 1);
        drop(page);
    }
    assert_eq!(runtime.pointer().listener_count(), 0);
}
