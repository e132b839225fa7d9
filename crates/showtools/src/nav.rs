//! Navigation helpers and the terminal typing effect.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::schedule::Scheduler;

/// Whether a nav link points at the current page. The site root counts as
/// `index.html`.
pub fn is_active_link(current_path: &str, href: &str) -> bool {
    if href.is_empty() {
        return false;
    }
    current_path.ends_with(href) || (current_path == "/" && href == "index.html")
}

/// Element id an in-page anchor scrolls to: `#features` -> `features`.
/// A bare `#` and anything that is not a fragment link give `None`.
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Reveals text one character at a time, like a terminal typing it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typewriter {
    chars: Vec<char>,
    shown: usize,
}

impl Typewriter {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            shown: 0,
        }
    }

    /// Reveal the next character. `None` once everything is shown.
    pub fn tick(&mut self) -> Option<char> {
        let next = self.chars.get(self.shown).copied()?;
        self.shown += 1;
        Some(next)
    }

    pub fn visible(&self) -> String {
        self.chars[..self.shown].iter().collect()
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.chars.len()
    }

    /// Type the whole text on `scheduler`, one character every `interval`.
    ///
    /// `on_frame(text, typing)` is called with the empty string first, then
    /// after every character, and finally with `typing == false` once
    /// `linger` has passed after the last character. Empty text produces no
    /// frames at all.
    pub fn run<F>(
        self,
        scheduler: Rc<dyn Scheduler>,
        interval: Duration,
        linger: Duration,
        mut on_frame: F,
    ) where
        F: FnMut(&str, bool) + 'static,
    {
        if self.chars.is_empty() {
            return;
        }
        on_frame("", true);
        let run = Rc::new(RefCell::new(TypeRun {
            writer: self,
            on_frame,
            interval,
            linger,
        }));
        schedule_tick(run, scheduler);
    }
}

struct TypeRun<F> {
    writer: Typewriter,
    on_frame: F,
    interval: Duration,
    linger: Duration,
}

fn schedule_tick<F>(run: Rc<RefCell<TypeRun<F>>>, scheduler: Rc<dyn Scheduler>)
where
    F: FnMut(&str, bool) + 'static,
{
    let interval = run.borrow().interval;
    let next_scheduler = scheduler.clone();
    scheduler
        .schedule(
            interval,
            Box::new(move || {
                let (done, linger) = {
                    let mut r = run.borrow_mut();
                    r.writer.tick();
                    let text = r.writer.visible();
                    (r.on_frame)(&text, true);
                    (r.writer.is_done(), r.linger)
                };
                if !done {
                    schedule_tick(run, next_scheduler);
                    return;
                }
                next_scheduler
                    .schedule(
                        linger,
                        Box::new(move || {
                            let mut r = run.borrow_mut();
                            let text = r.writer.visible();
                            (r.on_frame)(&text, false);
                        }),
                    )
                    .detach();
            }),
        )
        .detach();
}
