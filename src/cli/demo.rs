//! Demo pages served by `routelit serve` and driven by `routelit replay`.
//!
//! | Path    | Shows                                                  |
//! |---------|--------------------------------------------------------|
//! | `/`     | Counter, `clicks` fragment, dialog, `menu` drawer      |
//! | `/form` | Form whose field events wait for the submit            |

use routelit::app::{Fragment, View};
use routelit::config::AppConfig;
use routelit::core::element::props;
use routelit::{App, Builder, SessionStore, ViewResult};
use serde_json::{Value, json};

/// Demo app plus its pages.
pub struct Demo<S: SessionStore> {
    app: App<S>,
    pages: Vec<(&'static str, Box<View>)>,
}

impl<S: SessionStore> Demo<S> {
    pub fn new(store: S, config: &AppConfig) -> Self {
        let mut app = App::new(store)
            .with_lifecycle(config.lifecycle)
            .with_session(config.session.clone());

        let clicks = app.fragment("clicks", clicks_fragment);
        let menu = app.overlay("menu", "drawer", props([("side", json!("left"))]), menu_drawer);

        let home: Box<View> = Box::new(move |ui: &mut Builder| -> ViewResult { home(ui, &clicks, &menu) });
        let contact: Box<View> = Box::new(contact);

        Self {
            app,
            pages: vec![("/", home), ("/form", contact)],
        }
    }

    #[inline]
    pub fn app(&self) -> &App<S> {
        &self.app
    }

    /// View serving `path`.
    pub fn page(&self, path: &str) -> Option<&View> {
        self.pages
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, view)| view.as_ref())
    }
}

fn counter(ui: &Builder, key: &str) -> i64 {
    ui.state().get(key).and_then(Value::as_i64).unwrap_or(0)
}

fn home(ui: &mut Builder, clicks: &Fragment, menu: &Fragment) -> ViewResult {
    ui.set_page_config("Routelit demo", "Counter, fragment, dialog and drawer");
    ui.text("Routelit demo", Some("title"));
    ui.link("/form", "Contact form", Some("to-form"));

    let mut count = counter(ui, "count");
    if ui.button("Increment", Some("inc"))? {
        count += 1;
        ui.state_mut().insert("count".into(), json!(count));
    }
    ui.text(&format!("Page clicks: {count}"), Some("count"));

    clicks.render(ui, json!({"label": "Fragment clicks"}))?;

    if ui.button("About", Some("open-about"))? {
        ui.state_mut().insert("about".into(), json!(true));
    }
    if ui.state().contains_key("about") {
        let mut dialog = ui.dialog("about", true)?;
        dialog.text("Built on the server, patched on the client.", Some("about-text"));
    }

    if ui.button("Menu", Some("open-menu"))? {
        ui.state_mut().insert("menu".into(), json!(true));
    }
    if ui.state().contains_key("menu") {
        menu.render(ui, Value::Null)?;
    }
    Ok(())
}

fn clicks_fragment(ui: &mut Builder, args: &Value) -> ViewResult {
    let label = args["label"].as_str().unwrap_or("Clicks").to_string();
    let mut count = counter(ui, "fragment_count");
    if ui.button("+1", Some("frag-inc"))? {
        count += 1;
        ui.state_mut().insert("fragment_count".into(), json!(count));
    }
    ui.text(&format!("{label}: {count}"), Some("frag-count"));
    Ok(())
}

fn menu_drawer(ui: &mut Builder, _args: &Value) -> ViewResult {
    ui.link("/", "Home", Some("menu-home"));
    ui.link("/form", "Contact form", Some("menu-form"));
    Ok(())
}

fn contact(ui: &mut Builder) -> ViewResult {
    ui.set_page_config("Contact", "Field events wait for the submit");
    ui.link("/", "Back", Some("back"));

    let (name, subscribe, sent) = {
        let mut form = ui.form("contact");
        let name = form.text_input("Name", "", Some("name"))?;
        let subscribe = form.checkbox("Subscribe", false, Some("subscribe"))?;
        let sent = form.submit_button("Send", Some("send"))?;
        (name, subscribe, sent)
    };

    if sent {
        let suffix = if subscribe { ", subscribed" } else { "" };
        ui.state_mut()
            .insert("message".into(), json!(format!("Thanks {name}{suffix}")));
    }
    if let Some(message) = ui.state().get("message").and_then(Value::as_str).map(str::to_owned) {
        ui.text(&message, Some("message"));
    }
    Ok(())
}
