//! Feature flows behind the top-level menu items.
//!
//! A flow runs on the foreground thread after the session has paused
//! navigation. It owns the display and the button until it returns; the
//! session then resets navigation and redraws the menu.
//!
//! Directory errors are handled here with a short notice. Everything else
//! propagates.

use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::contacts::ContactDirectory;
use crate::display::{DisplayHandle, Frame};
use crate::error::{Error, Result};
use crate::input::InputSource;
use crate::menu::view;
use crate::session::Shared;
use crate::types::{Brightness, EMERGENCY_NUMBERS, MenuItem, ScrollSpeed, SessionConfig};
use crate::widgets::{EntryOptions, collect_input, confirm_action, select_from_options};

/// Everything a flow may touch.
pub struct FlowContext<'a> {
    pub shared: &'a Shared,
    pub input: &'a mut dyn InputSource,
    pub contacts: &'a mut ContactDirectory,
    pub config: &'a SessionConfig,
}

impl FlowContext<'_> {
    fn display(&self) -> &DisplayHandle {
        self.shared.display()
    }

    /// Draw `frame` and keep it up for `hold`.
    fn show(&self, frame: &Frame, hold: Duration) -> Result<()> {
        self.display().present(frame)?;
        if !hold.is_zero() {
            thread::sleep(hold);
        }
        Ok(())
    }

    fn notice(&self, text: &str) -> Result<()> {
        self.show(&view::notice(text), self.config.notice_hold())
    }

    fn message(&self, top: &str, bottom: &str) -> Result<()> {
        self.show(&view::message(top, bottom), self.config.notice_hold())
    }

    fn select<S: AsRef<str>>(&mut self, prompt: &str, options: &[S]) -> Result<usize> {
        select_from_options(self.shared.display(), &mut *self.input, prompt, options)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        confirm_action(self.shared.display(), &mut *self.input, prompt)
    }

    fn collect(&mut self, options: &EntryOptions) -> Result<String> {
        collect_input(
            self.shared.display(),
            &mut *self.input,
            options,
            self.config.display_columns,
            self.config.wheel_step(),
        )
    }
}

/// Signature shared by every flow.
pub type FlowFn = fn(&mut FlowContext<'_>) -> Result<()>;

/// Handler table, one entry per menu item.
pub const FLOWS: [(MenuItem, FlowFn); 6] = [
    (MenuItem::Dial, dial as FlowFn),
    (MenuItem::Contacts, contacts as FlowFn),
    (MenuItem::Emergency, emergency as FlowFn),
    (MenuItem::HeartRate, heart_rate as FlowFn),
    (MenuItem::Settings, settings as FlowFn),
    (MenuItem::System, system as FlowFn),
];

/// Look up the flow for a menu item.
pub fn flow_for(item: MenuItem) -> Option<FlowFn> {
    FLOWS.iter().find(|(i, _)| *i == item).map(|(_, flow)| *flow)
}

/// Resolve a selector index back into its list.
fn pick<T: Copy>(items: &[T], index: usize) -> Result<T> {
    items.get(index).copied().ok_or(Error::InvalidSelection {
        index,
        len: items.len(),
    })
}

// ============================================================================
// DIAL / EMERGENCY / HEART RATE
// ============================================================================

fn dial(ctx: &mut FlowContext<'_>) -> Result<()> {
    let number = ctx.collect(&EntryOptions::dial())?;
    if number.is_empty() {
        return ctx.notice("No number");
    }
    info!(%number, "dialing");
    ctx.show(&view::message("Dialing:", &number), ctx.config.dial_hold())
}

fn emergency(ctx: &mut FlowContext<'_>) -> Result<()> {
    let index = ctx.select("Emergency", &EMERGENCY_NUMBERS)?;
    let number = pick(&EMERGENCY_NUMBERS, index)?;
    info!(number, "dialing emergency number");
    ctx.show(&view::notice(&format!("Dialing: {number}")), ctx.config.dial_hold())
}

fn heart_rate(ctx: &mut FlowContext<'_>) -> Result<()> {
    ctx.notice("No HR Sensor")
}

// ============================================================================
// CONTACTS
// ============================================================================

fn contacts(ctx: &mut FlowContext<'_>) -> Result<()> {
    let list = ctx.contacts.list();
    let index = ctx.select("Manage Contacts", &list)?;
    // "Add Contact" is always last, whatever the contacts are called.
    if index + 1 == list.len() {
        return add_contact(ctx);
    }
    let name = list
        .get(index)
        .cloned()
        .ok_or(Error::InvalidSelection {
            index,
            len: list.len(),
        })?;
    manage_contact(ctx, &name)
}

fn add_contact(ctx: &mut FlowContext<'_>) -> Result<()> {
    let name = ctx.collect(&EntryOptions::contact_name("Enter Name"))?;
    if name.is_empty() {
        return ctx.notice("Cancelled");
    }
    let number = ctx.collect(&EntryOptions::contact_number("Enter Number"))?;

    match ctx.contacts.add(&name, &number) {
        Ok(()) => {
            info!(%name, "contact added");
            ctx.message("Contact added", &name)
        }
        Err(Error::DuplicateKey(name)) => {
            warn!(%name, "contact not added: name exists");
            ctx.message("Name exists", &name)
        }
        Err(e) => Err(e),
    }
}

fn manage_contact(ctx: &mut FlowContext<'_>, name: &str) -> Result<()> {
    const ACTIONS: [&str; 2] = ["Edit", "Remove"];
    match ctx.select(name, &ACTIONS)? {
        0 => edit_contact(ctx, name),
        _ => remove_contact(ctx, name),
    }
}

fn edit_contact(ctx: &mut FlowContext<'_>, name: &str) -> Result<()> {
    let new_name = ctx.collect(&EntryOptions::contact_name("New Name"))?;
    let new_number = ctx.collect(&EntryOptions::contact_number("New Number"))?;

    match ctx.contacts.edit(name, &new_name, &new_number) {
        Ok(()) => {
            let shown = if new_name.is_empty() { name } else { new_name.as_str() };
            info!(old = name, new = shown, "contact edited");
            ctx.message("Contact edited", shown)
        }
        Err(Error::NotFound(name)) => {
            warn!(%name, "edit failed: no such contact");
            ctx.notice("Not found")
        }
        Err(e) => Err(e),
    }
}

fn remove_contact(ctx: &mut FlowContext<'_>, name: &str) -> Result<()> {
    if !ctx.confirm(&format!("Remove {name}?"))? {
        return ctx.notice("Cancelled");
    }

    match ctx.contacts.remove(name) {
        Ok(()) => {
            info!(name, "contact removed");
            ctx.message("Contact removed", name)
        }
        Err(Error::NotFound(name)) => {
            warn!(%name, "remove failed: no such contact");
            ctx.notice("Not found")
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// SETTINGS
// ============================================================================

fn settings(ctx: &mut FlowContext<'_>) -> Result<()> {
    const OPTIONS: [&str; 2] = ["Scroll Speed", "Backlight Brightness"];
    match ctx.select("Adjust Settings", &OPTIONS)? {
        0 => {
            let labels = ScrollSpeed::ALL.map(ScrollSpeed::label);
            let index = ctx.select("Scroll Speed", &labels)?;
            let speed = pick(&ScrollSpeed::ALL, index)?;
            ctx.shared.update_settings(|s| s.scroll_speed = speed)?;
            info!(speed = speed.label(), "scroll speed changed");
            ctx.notice(&format!("Speed: {}", speed.label()))
        }
        _ => {
            let labels = Brightness::ALL.map(Brightness::label);
            let index = ctx.select("Backlight", &labels)?;
            let level = pick(&Brightness::ALL, index)?;
            ctx.shared.update_settings(|s| s.brightness = level)?;
            info!(brightness = level.label(), "brightness recorded");
            ctx.notice(&format!("Brightness: {}", level.label()))
        }
    }
}

// ============================================================================
// SYSTEM
// ============================================================================

fn system(ctx: &mut FlowContext<'_>) -> Result<()> {
    const OPTIONS: [&str; 3] = ["About", "Shut Down", "Back"];
    match ctx.select("System", &OPTIONS)? {
        0 => {
            let title = format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            let count = format!("{} contacts", ctx.contacts.len());
            ctx.message(&title, &count)
        }
        1 => {
            if ctx.confirm("Shut down?")? {
                info!("shutdown requested from menu");
                ctx.shared.request_shutdown();
                ctx.show(&view::notice("Shutting down"), Duration::ZERO)
            } else {
                Ok(())
            }
        }
        _ => Ok(()),
    }
}

// ============================================================================
// TESTS
// ============================================================================
