//! End-to-end tests for the composition engine.

use std::fmt::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use splates_core::domain::escape;
use splates_core::error::ErrorCategory;
use splates_core::prelude::*;

// ============================================================================
// Fixtures
// ============================================================================

struct Plain;

impl TemplateUnit for Plain {
    fn display(&self, t: &mut Template, _: &Params) -> SplatesResult<()> {
        t.write("plain");
        Ok(())
    }
}

struct Clock {
    now: &'static str,
}

/// Uses every injection style: helper slot, global slot, escaped global,
/// optional global and a positional helper parameter.
#[derive(Default)]
struct Profile {
    user: String,
    fetch: Option<Fetcher>,
    clock: Option<Arc<Clock>>,
    title: Option<Value>,
    motto: Option<Value>,
}

impl Profile {
    fn new(user: &str) -> Self {
        Self {
            user: user.into(),
            ..Self::default()
        }
    }
}

impl TemplateUnit for Profile {
    fn describe(bindings: &mut BindingsBuilder) {
        bindings.inject::<Fetcher>("fetch").done();
        bindings.inject::<Clock>("clock").key("app.clock").done();
        bindings.inject::<String>("title").escaped().done();
        bindings.inject::<String>("motto").optional().done();
        bindings.parameter::<Escaper>("e");
    }

    fn inject(&mut self, slot: &str, value: Injection) -> SplatesResult<()> {
        match slot {
            "fetch" => self.fetch = value.into_fetcher(),
            "clock" => self.clock = value.downcast::<Clock>(),
            "title" => self.title = value.into_value(),
            "motto" => self.motto = value.into_value(),
            _ => {}
        }
        Ok(())
    }

    fn own_data(&self) -> Data {
        Data::new().with("user", self.user.as_str())
    }

    fn display(&self, t: &mut Template, params: &Params) -> SplatesResult<()> {
        let e = params.escaper(0).copied().unwrap_or_default();
        let title = self.title.clone().unwrap_or_default();
        let now = self.clock.as_ref().map(|c| c.now).unwrap_or("?");
        write!(t, "<h1>{title}</h1><p>{}</p><time>{now}</time>", e.escape(&self.user))?;

        if let Some(fetch) = &self.fetch {
            let badge = fetch.fetch(Badge, Data::new())?;
            t.write(&badge);
        }
        Ok(())
    }
}

/// Reads `user` from inherited data.
struct Badge;

impl TemplateUnit for Badge {
    fn display(&self, t: &mut Template, _: &Params) -> SplatesResult<()> {
        let user = t.get("user").map(Value::to_string).unwrap_or_default();
        let escaped = t.e(&user);
        write!(t, "<span>{escaped}</span>")?;
        Ok(())
    }
}

fn engine_with_profile_globals() -> Engine {
    let engine = Engine::new();
    engine
        .add_global("app.clock", Value::service(Clock { now: "12:00" }))
        .unwrap();
    engine.add_global("title", "Tom & Jerry").unwrap();
    engine
}

#[derive(Debug, thiserror::Error)]
#[error("template exploded")]
struct Exploded;

// ============================================================================
// Dependency resolution and injection
// ============================================================================

#[test]
fn zero_slot_units_share_one_empty_binding_list() {
    let engine = Engine::new();
    let first = engine.registry().resolve(UnitType::of::<Plain>()).unwrap();
    let second = engine.registry().resolve(UnitType::of::<Plain>()).unwrap();

    assert!(first.is_empty());
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(engine.render(Plain, Data::new()).unwrap(), "plain");
}

#[test]
fn every_injection_style_reaches_the_unit() {
    let engine = engine_with_profile_globals();
    let html = engine.render(Profile::new("<ann>"), Data::new()).unwrap();

    assert_eq!(
        html,
        "<h1>Tom &amp; Jerry</h1><p>&lt;ann&gt;</p><time>12:00</time><span>&lt;ann&gt;</span>"
    );
}

#[test]
fn escaped_globals_wrap_strings_but_not_services() {
    #[derive(Default)]
    struct Probe {
        title: Option<Value>,
        svc: Option<Value>,
    }

    impl TemplateUnit for Probe {
        fn describe(bindings: &mut BindingsBuilder) {
            bindings.inject::<String>("title").escaped().done();
            bindings.inject::<Clock>("svc").escaped().done();
        }

        fn inject(&mut self, slot: &str, value: Injection) -> SplatesResult<()> {
            match slot {
                "title" => self.title = value.into_value(),
                _ => self.svc = value.into_value(),
            }
            Ok(())
        }

        fn display(&self, t: &mut Template, _: &Params) -> SplatesResult<()> {
            assert!(matches!(self.title, Some(Value::Text(_))));
            assert!(matches!(self.svc, Some(Value::Service(_))));
            let title = self.title.clone().unwrap_or_default();
            write!(t, "{title}")?;
            Ok(())
        }
    }

    let engine = Engine::new();
    engine.add_global("title", "<b>x</b>").unwrap();
    engine
        .add_global("svc", Value::service(Clock { now: "now" }))
        .unwrap();

    let html = engine.render(Probe::default(), Data::new()).unwrap();
    assert_eq!(html, "&lt;b&gt;x&lt;/b&gt;");
}

#[test]
fn missing_required_global_names_unit_and_slot() {
    let engine = Engine::new();
    engine.add_global("title", "t").unwrap();

    let err = engine.render(Profile::new("ann"), Data::new()).unwrap_err();
    match &err {
        SplatesError::Application(ApplicationError::MissingDependency { unit, slot, key }) => {
            assert!(unit.ends_with("Profile"));
            assert_eq!(slot, "clock");
            assert_eq!(key, "app.clock");
        }
        other => panic!("unexpected error: {other}"),
    }

    engine
        .add_global("app.clock", Value::service(Clock { now: "1" }))
        .unwrap();
    assert!(engine.render(Profile::new("ann"), Data::new()).is_ok());
}

#[test]
fn optional_slots_are_skipped_when_absent() {
    let engine = engine_with_profile_globals();
    let mut unit = Profile::new("ann");
    engine.make(&mut unit, Data::new()).unwrap();

    assert!(unit.motto.is_none());
    assert!(unit.fetch.is_some());
    assert!(unit.clock.is_some());
}

#[test]
fn make_injects_without_rendering() {
    let engine = engine_with_profile_globals();
    let mut unit = Profile::new("ann");
    let template = engine.make(&mut unit, Data::new().with("extra", 1)).unwrap();

    assert_eq!(template.get("user"), Some(&Value::from("ann")));
    assert_eq!(template.get("extra"), Some(&Value::Int(1)));
    assert_eq!(template.params().len(), 1);
    assert!(template.params().escaper(0).is_some());
    assert!(template.name().ends_with("Profile"));
}

#[test]
fn units_without_inject_reject_declared_slots() {
    struct Stubborn;

    impl TemplateUnit for Stubborn {
        fn describe(bindings: &mut BindingsBuilder) {
            bindings.inject::<Escaper>("e").done();
        }

        fn display(&self, _: &mut Template, _: &Params) -> SplatesResult<()> {
            Ok(())
        }
    }

    let err = Engine::new().render(Stubborn, Data::new()).unwrap_err();
    assert!(matches!(
        err,
        SplatesError::Application(ApplicationError::InjectionRejected { .. })
    ));
}

#[test]
fn describe_runs_once_per_type() {
    static SCANS: AtomicUsize = AtomicUsize::new(0);

    struct Counted;

    impl TemplateUnit for Counted {
        fn describe(_: &mut BindingsBuilder) {
            SCANS.fetch_add(1, Ordering::SeqCst);
        }

        fn display(&self, _: &mut Template, _: &Params) -> SplatesResult<()> {
            Ok(())
        }
    }

    let engine = Engine::new();
    for _ in 0..3 {
        engine.render(Counted, Data::new()).unwrap();
    }
    assert_eq!(SCANS.load(Ordering::SeqCst), 1);

    engine.clear_cache().unwrap();
    engine.warm_cache(&[UnitType::of::<Counted>()]).unwrap();
    engine.render(Counted, Data::new()).unwrap();
    assert_eq!(SCANS.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Escaping and data
// ============================================================================

#[test]
fn escape_matches_html_entity_policy() {
    assert_eq!(
        escape("<script>alert(1)</script>"),
        "&lt;script&gt;alert(1)&lt;/script&gt;"
    );
    assert_eq!(escape("O'Brien & Co."), "O&#039;Brien &amp; Co.");
}

#[test]
fn fetch_inherits_parent_data_unless_disabled() {
    let engine = Engine::new();
    let parent = from_fn(|t: &mut Template| {
        let inherited = t.fetch(
            from_fn(|t: &mut Template| {
                let a = t.get("a").map(Value::to_string).unwrap_or_default();
                let b = t.get("b").map(Value::to_string).unwrap_or_default();
                write!(t, "{a}{b}")?;
                Ok(())
            }),
            Data::new().with("b", "child"),
        )?;
        let isolated = t.fetch_with(
            from_fn(|t: &mut Template| {
                let a = t.get("a").map(Value::to_string).unwrap_or("-".into());
                t.write(&a);
                Ok(())
            }),
            Data::new(),
            false,
        )?;
        write!(t, "{inherited}|{isolated}")?;
        Ok(())
    });

    let out = engine
        .render(parent, Data::new().with("a", "A").with("b", "parent"))
        .unwrap();
    assert_eq!(out, "Achild|-");
}

/// Adds data in its body, then renders children every way it can.
#[derive(Default)]
struct LateData {
    fetch: Option<Fetcher>,
}

impl TemplateUnit for LateData {
    fn describe(bindings: &mut BindingsBuilder) {
        bindings.inject::<Fetcher>("fetch").done();
        bindings.parameter::<Fetcher>("fetch_param");
    }

    fn inject(&mut self, slot: &str, value: Injection) -> SplatesResult<()> {
        if slot == "fetch" {
            self.fetch = value.into_fetcher();
        }
        Ok(())
    }

    fn display(&self, t: &mut Template, params: &Params) -> SplatesResult<()> {
        t.add_data(Data::new().with("late", "set-in-body"));

        let child = || {
            from_fn(|t: &mut Template| {
                let late = t.get("late").map(Value::to_string).unwrap_or("missing".into());
                t.write(&late);
                Ok(())
            })
        };
        let via_template = t.fetch(child(), Data::new())?;
        let via_slot = match &self.fetch {
            Some(fetch) => fetch.fetch(child(), Data::new())?,
            None => "no slot".into(),
        };
        let via_param = match params.fetcher(0) {
            Some(fetch) => fetch.fetch(child(), Data::new())?,
            None => "no param".into(),
        };
        let isolated = match params.fetcher(0) {
            Some(fetch) => fetch.render(child(), Data::new())?,
            None => "no param".into(),
        };
        write!(t, "{via_template}|{via_slot}|{via_param}|{isolated}")?;
        Ok(())
    }
}

#[test]
fn injected_fetchers_see_data_added_during_the_body() {
    let out = Engine::new()
        .render(LateData::default(), Data::new())
        .unwrap();
    assert_eq!(out, "set-in-body|set-in-body|set-in-body|missing");
}

#[test]
fn shared_data_is_visible_by_template_name() {
    let engine = Engine::new();
    engine
        .add_data(Data::new().with("site", "Example"), Scope::All)
        .unwrap();
    engine
        .add_data(
            Data::new().with("heading", "Welcome"),
            Scope::templates(["home"]),
        )
        .unwrap();

    let body = |t: &mut Template| -> SplatesResult<()> {
        let site = t.get("site").map(Value::to_string).unwrap_or_default();
        let heading = t.get("heading").map(Value::to_string).unwrap_or_default();
        write!(t, "{site}:{heading}")?;
        Ok(())
    };

    assert_eq!(
        engine.render(from_fn(body).named("home"), Data::new()).unwrap(),
        "Example:Welcome"
    );
    assert_eq!(
        engine.render(from_fn(body).named("about"), Data::new()).unwrap(),
        "Example:"
    );
}

// ============================================================================
// Capture frames and error propagation
// ============================================================================

#[test]
fn capture_returns_inner_output_only() {
    let engine = Engine::new();
    let out = engine
        .render(
            from_fn(|t: &mut Template| {
                t.write("a");
                let inner = t.capture(|t| {
                    t.write("b");
                    Ok(())
                })?;
                t.write("c");
                t.write(&inner.to_uppercase());
                Ok(())
            }),
            Data::new(),
        )
        .unwrap();
    assert_eq!(out, "acB");
}

#[test]
fn slots_render_lazily() {
    let engine = Engine::new();
    let out = engine
        .render(
            from_fn(|t: &mut Template| {
                let slot = t.slot(|buf| write!(buf, "<em>later</em>"));
                t.write("before:");
                t.write_value(&Value::Slot(slot));
                Ok(())
            }),
            Data::new(),
        )
        .unwrap();
    assert_eq!(out, "before:<em>later</em>");
}

#[test]
fn failing_slot_body_displays_as_empty() {
    let engine = Engine::new();
    let out = engine
        .render(
            from_fn(|t: &mut Template| {
                let slot = t.slot(|buf| {
                    buf.push_str("partial");
                    Err(std::fmt::Error)
                });
                write!(t, "[{}]", Value::Slot(slot))?;
                Ok(())
            }),
            Data::new(),
        )
        .unwrap();
    assert_eq!(out, "[]");
}

#[test]
fn failing_grandchild_stops_every_ancestor() {
    let engine = Engine::new();
    let continued = Arc::new(AtomicUsize::new(0));
    let marker = continued.clone();

    let parent = from_fn(move |t: &mut Template| {
        t.write("parent-start");
        let child = t.fetch(
            from_fn(|t: &mut Template| {
                t.write("child-partial");
                t.capture(|t| {
                    t.write("deep");
                    t.fetch(
                        from_fn(|t: &mut Template| {
                            t.write("grandchild");
                            Err(SplatesError::render(Exploded))
                        }),
                        Data::new(),
                    )?;
                    Ok(())
                })?;
                Ok(())
            }),
            Data::new(),
        )?;
        marker.fetch_add(1, Ordering::SeqCst);
        t.write(&child);
        Ok(())
    });

    let err = engine.render(parent, Data::new()).unwrap_err();
    assert_eq!(err.to_string(), "template exploded");
    assert!(matches!(err, SplatesError::Render(_)));
    assert_eq!(continued.load(Ordering::SeqCst), 0);
}

#[test]
fn handled_child_failure_leaks_no_partial_output() {
    let engine = Engine::new();
    let outer = from_fn(|t: &mut Template| {
        t.write("outer:");
        let failed = t.fetch(
            from_fn(|t: &mut Template| {
                t.write("partial");
                t.capture(|t| {
                    t.write("buffered");
                    Err(SplatesError::render(Exploded))
                })?;
                Ok(())
            }),
            Data::new(),
        );
        match failed {
            Ok(_) => t.write("unexpected"),
            Err(_) => t.write("recovered"),
        }
        Ok(())
    });

    assert_eq!(engine.render(outer, Data::new()).unwrap(), "outer:recovered");
}

#[test]
fn failed_capture_discards_its_frames() {
    let engine = Engine::new();
    let out = engine
        .render(
            from_fn(|t: &mut Template| {
                t.write("keep");
                let failed = t.capture(|t| {
                    t.write("drop");
                    t.capture(|t| {
                        t.write("drop too");
                        Err(SplatesError::render(Exploded))
                    })?;
                    Ok(())
                });
                assert!(failed.is_err());
                t.write("!");
                Ok(())
            }),
            Data::new(),
        )
        .unwrap();
    assert_eq!(out, "keep!");
}

#[test]
fn section_started_inside_capture_must_stop_there() {
    let out = Engine::new()
        .render(
            from_fn(|t: &mut Template| {
                t.write("before|");
                let crossed = t.capture(|t| {
                    t.start("s")?;
                    t.write("X");
                    Ok(())
                });
                assert!(matches!(
                    &crossed,
                    Err(SplatesError::Domain(DomainError::SectionCrossesCapture { name })) if name == "s"
                ));

                // the dangling section was dropped with its frame
                assert!(matches!(
                    t.stop(),
                    Err(SplatesError::Domain(DomainError::SectionNotStarted))
                ));
                assert!(t.section("s").is_none());
                t.write("after");
                Ok(())
            }),
            Data::new(),
        )
        .unwrap();
    assert_eq!(out, "before|after");
}

#[test]
fn stop_inside_capture_fails_and_keeps_outer_frames() {
    let out = Engine::new()
        .render(
            from_fn(|t: &mut Template| {
                t.write("a");
                t.start("s")?;
                let crossed = t.capture(|t| {
                    t.write("c");
                    t.stop()?;
                    t.write("d");
                    Ok(())
                });
                assert!(matches!(
                    crossed,
                    Err(SplatesError::Domain(DomainError::SectionCrossesCapture { .. }))
                ));

                // still open, still writing into its own frame
                t.write("e");
                t.stop()?;
                let section = t.section("s").unwrap_or_default().to_owned();
                write!(t, "[{section}]")?;
                Ok(())
            }),
            Data::new(),
        )
        .unwrap();
    assert_eq!(out, "a[e]");
}

#[test]
fn sections_may_open_and_close_within_one_capture() {
    let out = Engine::new()
        .render(
            from_fn(|t: &mut Template| {
                let captured = t.capture(|t| {
                    t.write("<");
                    t.start("s")?;
                    t.write("inside");
                    t.stop()?;
                    t.write(">");
                    Ok(())
                })?;
                let section = t.section("s").unwrap_or_default().to_owned();
                write!(t, "{captured}{section}")?;
                Ok(())
            }),
            Data::new(),
        )
        .unwrap();
    assert_eq!(out, "<>inside");
}

#[test]
fn propagated_crossing_fails_the_render() {
    let err = Engine::new()
        .render(
            from_fn(|t: &mut Template| {
                t.capture(|t| t.start("s"))?;
                t.stop()
            }),
            Data::new(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        SplatesError::Domain(DomainError::SectionCrossesCapture { .. })
    ));
    assert_eq!(err.category(), ErrorCategory::Misuse);
}

// ============================================================================
// Sections and layouts
// ============================================================================

fn write_section(t: &mut Template, mode: SectionMode, name: &str, body: &str) -> SplatesResult<()> {
    match mode {
        SectionMode::Rewrite => t.start(name)?,
        SectionMode::Append => t.push(name)?,
        SectionMode::Prepend => t.unshift(name)?,
    }
    t.write(body);
    t.stop()
}

#[test]
fn rewrite_keeps_first_definition_but_runs_later_bodies() {
    let engine = Engine::new();
    let ran = Arc::new(AtomicUsize::new(0));
    let counter = ran.clone();

    let out = engine
        .render(
            from_fn(move |t: &mut Template| {
                write_section(t, SectionMode::Rewrite, "s", "first")?;
                t.start("s")?;
                counter.fetch_add(1, Ordering::SeqCst);
                t.write("second");
                t.stop()?;
                let s = t.section("s").unwrap_or_default().to_owned();
                t.write(&s);
                Ok(())
            }),
            Data::new(),
        )
        .unwrap();

    assert_eq!(out, "first");
    assert_eq!(ran.load(Ordering::SeqCst), 1);
}

#[test]
fn child_definition_overrides_layout_default() {
    let engine = Engine::new();
    let layout = || {
        from_fn(|t: &mut Template| {
            write_section(t, SectionMode::Rewrite, "title", "Default title")?;
            let title = t.section("title").unwrap_or_default().to_owned();
            t.write(&title);
            Ok(())
        })
    };

    let with_title = from_fn(move |t: &mut Template| {
        t.layout(layout(), Data::new());
        write_section(t, SectionMode::Rewrite, "title", "Child title")
    });
    assert_eq!(engine.render(with_title, Data::new()).unwrap(), "Child title");

    let without_title = from_fn(move |t: &mut Template| {
        t.layout(layout(), Data::new());
        Ok(())
    });
    assert_eq!(
        engine.render(without_title, Data::new()).unwrap(),
        "Default title"
    );
}

#[test]
fn append_and_prepend_accumulate() {
    let engine = Engine::new();
    let out = engine
        .render(
            from_fn(|t: &mut Template| {
                write_section(t, SectionMode::Append, "s", "A")?;
                write_section(t, SectionMode::Append, "s", "B")?;
                write_section(t, SectionMode::Prepend, "s", "<")?;
                assert_eq!(t.section_mode("s"), Some(SectionMode::Prepend));
                let s = t.section("s").unwrap_or_default().to_owned();
                t.write(&s);
                Ok(())
            }),
            Data::new(),
        )
        .unwrap();
    assert_eq!(out, "<AB");
}

#[test]
fn content_is_reserved() {
    let engine = Engine::new();
    let err = engine
        .render(
            from_fn(|t: &mut Template| {
                t.start("content")?;
                Ok(())
            }),
            Data::new(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        SplatesError::Domain(DomainError::ReservedSectionName)
    ));
}

#[test]
fn nested_sections_fail_on_second_open() {
    let engine = Engine::new();
    let reached = Arc::new(AtomicUsize::new(0));
    let marker = reached.clone();

    let err = engine
        .render(
            from_fn(move |t: &mut Template| {
                t.start("a")?;
                marker.fetch_add(1, Ordering::SeqCst);
                t.start("b")?;
                marker.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
            Data::new(),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        SplatesError::Domain(DomainError::NestedSection { .. })
    ));
    assert_eq!(reached.load(Ordering::SeqCst), 1);
}

#[test]
fn stop_without_start_fails() {
    let err = Engine::new()
        .render(from_fn(|t: &mut Template| t.stop()), Data::new())
        .unwrap_err();
    assert!(matches!(
        err,
        SplatesError::Domain(DomainError::SectionNotStarted)
    ));
}

#[test]
fn unclosed_section_fails_the_render() {
    let err = Engine::new()
        .render(
            from_fn(|t: &mut Template| {
                t.push("scripts")?;
                t.write("<script></script>");
                Ok(())
            }),
            Data::new(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        SplatesError::Domain(DomainError::UnclosedSection { .. })
    ));
}

#[test]
fn layouts_chain_and_reassign_content_at_each_hop() {
    let engine = Engine::new();

    let l2 = || {
        from_fn(|t: &mut Template| {
            let x = t.section("x").unwrap_or_default().to_owned();
            let content = t.section("content").unwrap_or_default().to_owned();
            write!(t, "<l2 x=\"{x}\">{content}</l2>")?;
            Ok(())
        })
    };

    let l1 = move || {
        from_fn(move |t: &mut Template| {
            t.layout(l2(), Data::new());
            let content = t.section("content").unwrap_or_default().to_owned();
            write!(t, "<l1>{content}</l1>")?;
            Ok(())
        })
    };

    let unit = from_fn(move |t: &mut Template| {
        t.layout(l1(), Data::new());
        write_section(t, SectionMode::Rewrite, "x", "X")?;
        t.write("body");
        Ok(())
    });

    assert_eq!(
        engine.render(unit, Data::new()).unwrap(),
        "<l2 x=\"X\"><l1>body</l1></l2>"
    );
}

#[test]
fn layout_receives_its_own_data_and_section_modes() {
    let engine = Engine::new();
    let page = from_fn(|t: &mut Template| {
        t.layout(
            from_fn(|t: &mut Template| {
                let title = t.get("title").map(Value::to_string).unwrap_or_default();
                let mode = t
                    .section_mode("scripts")
                    .map(|m| m.to_string())
                    .unwrap_or_default();
                let scripts = t.section("scripts").unwrap_or_default().to_owned();
                write!(t, "{title}|{mode}|{scripts}")?;
                Ok(())
            }),
            Data::new().with("title", "Docs"),
        );
        write_section(t, SectionMode::Append, "scripts", "a.js")
    });

    assert_eq!(
        engine.render(page, Data::new().with("title", "ignored")).unwrap(),
        "Docs|append|a.js"
    );
}

// ============================================================================
// Named templates and functions
// ============================================================================

#[test]
fn named_templates_render_and_serve_as_layouts() {
    let engine = Engine::new();
    engine
        .register_template("layout", || {
            from_fn(|t: &mut Template| {
                let content = t.section("content").unwrap_or_default().to_owned();
                write!(t, "[{content}]")?;
                Ok(())
            })
        })
        .unwrap();
    engine
        .register_template("page", || {
            from_fn(|t: &mut Template| {
                t.layout_named("layout", Data::new());
                t.insert(Plain, Data::new())
            })
        })
        .unwrap();

    assert!(engine.exists("page"));
    assert!(!engine.exists("missing"));
    assert_eq!(engine.render_named("page", Data::new()).unwrap(), "[plain]");

    let err = engine.render_named("missing", Data::new()).unwrap_err();
    assert!(matches!(
        err,
        SplatesError::Application(ApplicationError::UnknownTemplate { .. })
    ));
}

struct TextExtension;

impl Extension for TextExtension {
    fn register(&self, engine: &Engine) -> SplatesResult<()> {
        engine.register_function("upper", |args: &[Value]| {
            let s = args.first().map(Value::to_string).unwrap_or_default();
            Ok(Value::from(s.to_uppercase()))
        })?;
        engine.register_function("wrap", |args: &[Value]| {
            let s = args.first().map(Value::to_string).unwrap_or_default();
            Ok(Value::from(format!("<{s}>")))
        })
    }
}

#[test]
fn functions_batch_and_escape() {
    let engine = Engine::new();
    engine.load_extensions(&[&TextExtension]).unwrap();
    assert!(engine.function_exists("upper"));

    let out = engine
        .render(
            from_fn(|t: &mut Template| {
                let plain = t.batch("hi", "upper|wrap")?;
                let safe = t.escape_with("hi", "upper|wrap")?;
                let called = t.call("upper", &[Value::from("x")])?;
                write!(t, "{plain} {safe} {called}")?;
                Ok(())
            }),
            Data::new(),
        )
        .unwrap();
    assert_eq!(out, "<HI> &lt;HI&gt; X");

    engine.drop_function("upper").unwrap();
    assert!(!engine.function_exists("upper"));
    assert!(matches!(
        engine.register_function("not valid", |_: &[Value]| Ok(Value::Null)),
        Err(SplatesError::Domain(DomainError::InvalidFunctionName { .. }))
    ));
    assert!(matches!(
        engine.load_extension(&TextExtension),
        Err(SplatesError::Domain(DomainError::DuplicateFunction { .. }))
    ));
}
