pub mod calories_currency;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::platform::{IncomingMessage, Reply};

/// Host events a plugin can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// A message arrived and is waiting for a reply
    OnHandleContext,
}

/// What the host should do after a handler returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventAction {
    #[default]
    Continue,
    /// Stop calling further plugins
    #[allow(dead_code)]
    Break,
    /// Stop calling further plugins and skip any default handling
    BreakPass,
}

impl EventAction {
    pub fn stops_dispatch(self) -> bool {
        matches!(self, EventAction::Break | EventAction::BreakPass)
    }
}

/// Mutable state threaded through every handler for one event
#[derive(Debug)]
pub struct EventContext {
    pub message: IncomingMessage,
    pub reply: Option<Reply>,
    pub action: EventAction,
}

impl EventContext {
    pub fn new(message: IncomingMessage) -> Self {
        Self {
            message,
            reply: None,
            action: EventAction::Continue,
        }
    }

    pub fn set_reply(&mut self, reply: Reply, action: EventAction) {
        self.reply = Some(reply);
        self.action = action;
    }
}

#[derive(Debug, Clone)]
pub struct PluginMetadata {
    pub name: String,
    /// Higher runs first
    pub priority: i32,
    pub description: String,
    pub version: String,
    /// Hidden plugins still handle events but are left out of listings and help
    pub hidden: bool,
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, ctx: &mut EventContext) -> Result<()>;
}

pub type HandlerTable = HashMap<Event, Arc<dyn EventHandler>>;

/// Everything the host needs to know about one plugin
pub struct Registration {
    pub metadata: PluginMetadata,
    pub handlers: HandlerTable,
    pub help_text: String,
}

/// Registry of plugins, kept in dispatch order
#[derive(Default)]
pub struct PluginHost {
    plugins: Vec<Registration>,
}

impl PluginHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin. Equal priorities keep registration order.
    pub fn register(&mut self, registration: Registration) {
        let meta = &registration.metadata;
        info!(
            "Registered plugin: {} v{} (priority {}): {}",
            meta.name, meta.version, meta.priority, meta.description
        );

        let priority = meta.priority;
        let position = self
            .plugins
            .iter()
            .position(|p| p.metadata.priority < priority)
            .unwrap_or(self.plugins.len());
        self.plugins.insert(position, registration);
    }

    /// Run every subscribed handler for `event` until one stops dispatch.
    pub async fn emit(&self, event: Event, ctx: &mut EventContext) {
        for plugin in &self.plugins {
            let Some(handler) = plugin.handlers.get(&event) else {
                continue;
            };

            if let Err(e) = handler.handle(ctx).await {
                error!(
                    "Plugin '{}' failed on {:?}: {:#}",
                    plugin.metadata.name, event, e
                );
                continue;
            }

            if ctx.action.stops_dispatch() {
                debug!(
                    "Plugin '{}' stopped dispatch of {:?} with {:?}",
                    plugin.metadata.name, event, ctx.action
                );
                break;
            }
        }
    }

    /// Metadata of visible plugins, in dispatch order
    pub fn list(&self) -> Vec<&PluginMetadata> {
        self.plugins
            .iter()
            .filter(|p| !p.metadata.hidden)
            .map(|p| &p.metadata)
            .collect()
    }

    pub fn help_text(&self, name: &str) -> Option<&str> {
        self.plugins
            .iter()
            .find(|p| !p.metadata.hidden && p.metadata.name == name)
            .map(|p| p.help_text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        action: EventAction,
        fail: bool,
    }

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, ctx: &mut EventContext) -> Result<()> {
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                anyhow::bail!("{} exploded", self.name);
            }
            if self.action != EventAction::Continue {
                ctx.set_reply(Reply::text(self.name), self.action);
            }
            Ok(())
        }
    }

    fn registration(
        name: &'static str,
        priority: i32,
        log: &Arc<Mutex<Vec<&'static str>>>,
        action: EventAction,
        fail: bool,
    ) -> Registration {
        let handler: Arc<dyn EventHandler> = Arc::new(Recorder {
            name,
            log: Arc::clone(log),
            action,
            fail,
        });
        Registration {
            metadata: PluginMetadata {
                name: name.to_string(),
                priority,
                description: format!("{name} plugin"),
                version: "0.1".to_string(),
                hidden: name.starts_with('_'),
            },
            handlers: HashMap::from([(Event::OnHandleContext, handler)]),
            help_text: format!("help for {name}"),
        }
    }

    #[tokio::test]
    async fn test_dispatch_follows_priority() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut host = PluginHost::new();
        host.register(registration("low", 1, &log, EventAction::Continue, false));
        host.register(registration("high", 100, &log, EventAction::Continue, false));
        host.register(registration("mid", 50, &log, EventAction::Continue, false));
        host.register(registration("mid2", 50, &log, EventAction::Continue, false));

        let mut ctx = EventContext::new(IncomingMessage::text("hi"));
        host.emit(Event::OnHandleContext, &mut ctx).await;

        assert_eq!(*log.lock().unwrap(), vec!["high", "mid", "mid2", "low"]);
        assert!(ctx.reply.is_none());
        assert_eq!(ctx.action, EventAction::Continue);
    }

    #[tokio::test]
    async fn test_break_pass_stops_dispatch() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut host = PluginHost::new();
        host.register(registration("first", 10, &log, EventAction::BreakPass, false));
        host.register(registration("second", 5, &log, EventAction::Continue, false));

        let mut ctx = EventContext::new(IncomingMessage::text("hi"));
        host.emit(Event::OnHandleContext, &mut ctx).await;

        assert_eq!(*log.lock().unwrap(), vec!["first"]);
        assert_eq!(ctx.reply, Some(Reply::text("first")));
        assert_eq!(ctx.action, EventAction::BreakPass);
    }

    #[tokio::test]
    async fn test_failing_handler_does_not_stop_dispatch() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut host = PluginHost::new();
        host.register(registration("broken", 10, &log, EventAction::BreakPass, true));
        host.register(registration("backup", 5, &log, EventAction::Break, false));

        let mut ctx = EventContext::new(IncomingMessage::text("hi"));
        host.emit(Event::OnHandleContext, &mut ctx).await;

        assert_eq!(*log.lock().unwrap(), vec!["broken", "backup"]);
        assert_eq!(ctx.reply, Some(Reply::text("backup")));
    }

    #[test]
    fn test_hidden_plugins_are_not_listed() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut host = PluginHost::new();
        host.register(registration("visible", 1, &log, EventAction::Continue, false));
        host.register(registration("_secret", 2, &log, EventAction::Continue, false));

        let names: Vec<_> = host.list().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["visible"]);
        assert_eq!(host.help_text("visible"), Some("help for visible"));
        assert_eq!(host.help_text("_secret"), None);
    }
}
