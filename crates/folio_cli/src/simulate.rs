//! Timeline simulation on a manual clock

use folio_animation::RandomOffsets;
use folio_app::{IndexPage, PageRuntime, SiteConfig};
use serde::Serialize;

/// What to do during a simulated run
#[derive(Clone, Copy, Debug)]
pub struct Plan {
    pub duration_ms: u64,
    pub step_ms: u64,
    pub click_email_at_ms: Option<u64>,
    /// Pointer move to this height at this time
    pub pointer: Option<(u64, f32)>,
    pub seed: u64,
}

#[derive(Debug, Serialize)]
pub struct ItemSnapshot {
    pub x: f32,
    pub y: f32,
    pub opacity: f32,
}

/// Page state at one point of the timeline
#[derive(Debug, Serialize)]
pub struct Snapshot {
    pub t_ms: u64,
    pub email: &'static str,
    pub trail_activated: bool,
    pub trail_settled: bool,
    pub trail: Vec<ItemSnapshot>,
    pub gradient_deg: f32,
    pub cube_rotating: bool,
    pub cube_rotate_once: bool,
}

impl Snapshot {
    fn capture(runtime: &PageRuntime, page: &IndexPage) -> Self {
        let cube = page.cube().state();
        Self {
            t_ms: runtime.now_ms(),
            email: page.email_state().stage().name(),
            trail_activated: page.is_trail_activated(),
            trail_settled: page.is_trail_settled(),
            trail: page
                .trail_items()
                .into_iter()
                .map(|item| ItemSnapshot {
                    x: item.offset.x,
                    y: item.offset.y,
                    opacity: item.opacity,
                })
                .collect(),
            gradient_deg: page.gradient().angle_deg(),
            cube_rotating: cube.rotating,
            cube_rotate_once: cube.rotate_once,
        }
    }

    /// One human-readable line
    pub fn summary(&self) -> String {
        let opacity: Vec<String> = self
            .trail
            .iter()
            .map(|item| format!("{:.2}", item.opacity))
            .collect();
        format!(
            "t={:>6}ms email={:<9} trail={} [{}] gradient={:.1}deg cube_once={}",
            self.t_ms,
            self.email,
            if self.trail_settled {
                "settled"
            } else if self.trail_activated {
                "moving"
            } else {
                "waiting"
            },
            opacity.join(" "),
            self.gradient_deg,
            self.cube_rotate_once
        )
    }
}

/// Mount the page and record a snapshot every `step_ms`
pub fn run(config: &SiteConfig, plan: Plan) -> Vec<Snapshot> {
    let runtime = PageRuntime::manual();
    let page = IndexPage::mount(&runtime, config, &mut RandomOffsets::seeded(plan.seed));
    let step = plan.step_ms.max(1);

    let mut clicked = false;
    let mut pointed = false;
    let mut fire_events = |now: u64| {
        if let Some(at) = plan.click_email_at_ms {
            if !clicked && now >= at {
                page.click_email();
                clicked = true;
            }
        }
        if let Some((at, y)) = plan.pointer {
            if !pointed && now >= at {
                runtime.pointer_move(0.0, y);
                pointed = true;
            }
        }
    };

    fire_events(runtime.now_ms());
    let mut snapshots = vec![Snapshot::capture(&runtime, &page)];

    while runtime.now_ms() < plan.duration_ms {
        let now = runtime.now_ms();

        // Land exactly on the next event or step boundary
        let mut next = (now + step).min(plan.duration_ms);
        for at in [plan.click_email_at_ms, plan.pointer.map(|(at, _)| at)]
            .into_iter()
            .flatten()
        {
            if at > now && at < next {
                next = at;
            }
        }

        runtime.advance(next - now);
        fire_events(runtime.now_ms());
        snapshots.push(Snapshot::capture(&runtime, &page));
    }

    tracing::debug!(
        "simulated {}ms in {} snapshots ({} frames)",
        plan.duration_ms,
        snapshots.len(),
        runtime.stats().frames
    );
    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> Plan {
        Plan {
            duration_ms: 3000,
            step_ms: 250,
            click_email_at_ms: Some(500),
            pointer: Some((0, 400.0)),
            seed: 9,
        }
    }

    #[test]
    fn test_email_stages_follow_click() {
        let snapshots = run(&SiteConfig::default(), plan());

        let at = |t: u64| snapshots.iter().find(|s| s.t_ms == t).unwrap();
        assert_eq!(at(500).email, "visible");
        assert_eq!(at(750).email, "splitting");
        assert_eq!(at(2000).email, "merged");
        assert_eq!(snapshots.last().unwrap().t_ms, 3000);
    }

    #[test]
    fn test_snapshots_serialize() {
        let snapshots = run(&SiteConfig::default(), plan());
        let json = serde_json::to_string(&snapshots[0]).unwrap();

        assert!(json.contains("\"email\":\"hidden\""));
        assert!(snapshots[0].summary().contains("waiting"));
    }
}
