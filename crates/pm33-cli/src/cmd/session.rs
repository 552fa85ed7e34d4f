//! Interactive session: one long-lived store driven line by line from stdin.
//!
//! Unlike the one-shot subcommands, session-only state (mode, navigation
//! context, breadcrumbs, counters) lives for the whole session. The keyboard
//! surface is attached on start and detached when the session ends.

use crate::cmd::{open_store, CliNavigator};
use crate::output::print_json;
use anyhow::Context;
use chrono::Utc;
use pm33_core::{
    keyboard::{Dispatch, KeyEvent, KeyboardSurface, ShortcutBindings, ShortcutGuard},
    state::{AnalysisSummary, NavigationContextUpdate},
    types::{AnalysisFramework, Integration, OnboardingStage, Persona, WorkflowMode},
    WorkflowStore,
};
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

const HELP: &str = "\
commands:
  mode <planning|executing|reviewing|firefighting>
  persona <senior-manager|executive-leader|founder>
  advance <stage>
  project <name> | integration <tool> | urgent <n> | pulse <n>
  analysis-result <id> <framework> <confidence>
  crumb <label> <path> [context] | crumbs | clear-crumbs
  analysis | sync | power | streak
  palette | search <text> | recent <id>
  sidebar | notify | clear-notifications | alert
  suggest | actions | firefighting | state
  key <chord> | attach | detach
  reset | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Mode(WorkflowMode),
    Persona(Persona),
    Advance(OnboardingStage),
    Navigation(NavigationContextUpdate),
    Crumb {
        label: String,
        path: String,
        context: Option<String>,
    },
    Crumbs,
    ClearCrumbs,
    Analysis,
    Sync,
    Power,
    Streak,
    Palette,
    Search(String),
    Recent(String),
    Sidebar,
    Notify,
    ClearNotifications,
    Alert,
    Suggest,
    Actions,
    Firefighting,
    State,
    Key(KeyEvent),
    Attach,
    Detach,
    Reset,
    Help,
    Quit,
}

fn arg<'a>(args: &[&'a str], i: usize, name: &str) -> anyhow::Result<&'a str> {
    args.get(i)
        .copied()
        .with_context(|| format!("missing <{name}>"))
}

impl SessionCommand {
    /// Parse one input line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> anyhow::Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let args: Vec<&str> = rest.split_whitespace().collect();

        let cmd = match verb {
            "mode" => SessionCommand::Mode(WorkflowMode::from_str(arg(&args, 0, "mode")?)?),
            "persona" => SessionCommand::Persona(Persona::from_str(arg(&args, 0, "persona")?)?),
            "advance" => {
                SessionCommand::Advance(OnboardingStage::from_str(arg(&args, 0, "stage")?)?)
            }
            "project" => {
                if rest.is_empty() {
                    anyhow::bail!("missing <name>");
                }
                SessionCommand::Navigation(NavigationContextUpdate {
                    current_project: Some(rest.to_string()),
                    ..Default::default()
                })
            }
            "integration" => SessionCommand::Navigation(NavigationContextUpdate {
                active_integration: Some(Integration::from_str(arg(&args, 0, "tool")?)?),
                ..Default::default()
            }),
            "urgent" => SessionCommand::Navigation(NavigationContextUpdate {
                urgent_tasks: Some(arg(&args, 0, "n")?.parse().context("<n> must be a number")?),
                ..Default::default()
            }),
            "pulse" => SessionCommand::Navigation(NavigationContextUpdate {
                team_pulse_score: Some(
                    arg(&args, 0, "n")?
                        .parse()
                        .context("<n> must be 0-100")?,
                ),
                ..Default::default()
            }),
            "analysis-result" => {
                let id = arg(&args, 0, "id")?;
                let framework = AnalysisFramework::from_str(arg(&args, 1, "framework")?)?;
                let confidence: u8 = arg(&args, 2, "confidence")?
                    .parse()
                    .context("<confidence> must be 0-100")?;
                SessionCommand::Navigation(NavigationContextUpdate {
                    last_analysis: Some(AnalysisSummary::new(
                        id,
                        framework,
                        confidence,
                        Utc::now(),
                    )),
                    ..Default::default()
                })
            }
            "crumb" => SessionCommand::Crumb {
                label: arg(&args, 0, "label")?.to_string(),
                path: arg(&args, 1, "path")?.to_string(),
                context: (args.len() > 2).then(|| args[2..].join(" ")),
            },
            "crumbs" => SessionCommand::Crumbs,
            "clear-crumbs" => SessionCommand::ClearCrumbs,
            "analysis" => SessionCommand::Analysis,
            "sync" => SessionCommand::Sync,
            "power" => SessionCommand::Power,
            "streak" => SessionCommand::Streak,
            "palette" => SessionCommand::Palette,
            "search" => SessionCommand::Search(rest.to_string()),
            "recent" => SessionCommand::Recent(arg(&args, 0, "id")?.to_string()),
            "sidebar" => SessionCommand::Sidebar,
            "notify" => SessionCommand::Notify,
            "clear-notifications" => SessionCommand::ClearNotifications,
            "alert" => SessionCommand::Alert,
            "suggest" => SessionCommand::Suggest,
            "actions" => SessionCommand::Actions,
            "firefighting" => SessionCommand::Firefighting,
            "state" => SessionCommand::State,
            "key" => SessionCommand::Key(KeyEvent::parse(rest)?),
            "attach" => SessionCommand::Attach,
            "detach" => SessionCommand::Detach,
            "reset" => SessionCommand::Reset,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            other => anyhow::bail!("unknown command '{other}' (try 'help')"),
        };
        Ok(Some(cmd))
    }
}

struct Session<'a> {
    store: WorkflowStore,
    surface: &'a KeyboardSurface,
    bindings: ShortcutBindings,
    guard: Option<ShortcutGuard>,
    navigator: CliNavigator,
}

impl Session<'_> {
    /// Returns false when the session should end.
    fn apply(&mut self, cmd: SessionCommand) -> anyhow::Result<bool> {
        let store = &mut self.store;
        match cmd {
            SessionCommand::Mode(mode) => {
                store.set_workflow_state(mode);
                println!("mode: {mode}");
            }
            SessionCommand::Persona(persona) => {
                store.set_user_persona(persona);
                println!(
                    "persona: {persona}  onboarding: {}",
                    store.state().onboarding_stage
                );
            }
            SessionCommand::Advance(stage) => {
                store.advance_onboarding(stage);
                println!("onboarding: {stage}");
            }
            SessionCommand::Navigation(update) => {
                store.update_navigation_context(update);
                print_json(&store.state().navigation_context)?;
            }
            SessionCommand::Crumb {
                label,
                path,
                context,
            } => {
                store.add_breadcrumb(label, path, context);
                print_crumbs(store);
            }
            SessionCommand::Crumbs => print_crumbs(store),
            SessionCommand::ClearCrumbs => {
                store.clear_breadcrumbs();
                println!("breadcrumbs cleared");
            }
            SessionCommand::Analysis => {
                store.record_strategic_analysis();
                print_engagement(store);
            }
            SessionCommand::Sync => {
                store.record_successful_sync();
                print_engagement(store);
            }
            SessionCommand::Power => {
                store.record_power_user_action();
                print_engagement(store);
            }
            SessionCommand::Streak => {
                store.update_streak();
                print_engagement(store);
            }
            SessionCommand::Palette => {
                store.toggle_command_palette();
                let open = store.state().command_palette.is_open;
                println!("palette: {}", if open { "open" } else { "closed" });
            }
            SessionCommand::Search(text) => {
                store.set_command_palette_search(text);
                println!("search: {:?}", store.state().command_palette.search_query);
            }
            SessionCommand::Recent(id) => {
                store.add_recent_command(id);
                println!(
                    "recent: {}",
                    store.state().command_palette.recent_commands.join(", ")
                );
            }
            SessionCommand::Sidebar => {
                store.toggle_sidebar();
                let collapsed = store.state().sidebar_collapsed;
                println!(
                    "sidebar: {}",
                    if collapsed { "collapsed" } else { "expanded" }
                );
            }
            SessionCommand::Notify => {
                store.push_notification();
                println!("notifications: {}", store.state().notification_count);
            }
            SessionCommand::ClearNotifications => {
                store.clear_notifications();
                println!("notifications: 0");
            }
            SessionCommand::Alert => {
                store.add_critical_alert();
                println!("critical alerts: {}", store.state().critical_alerts_count);
            }
            SessionCommand::Suggest => {
                for s in store.contextual_suggestions() {
                    println!("{}  {}  ({})", s.label, s.path, s.reason);
                }
            }
            SessionCommand::Actions => {
                for a in store.relevant_quick_actions() {
                    println!("{}  {}", a.id, a.label);
                }
            }
            SessionCommand::Firefighting => {
                let show = store.should_show_firefighting_mode();
                println!("firefighting: {}", if show { "yes" } else { "no" });
            }
            SessionCommand::State => print_json(store.state())?,
            SessionCommand::Key(event) => {
                match self.surface.dispatch(&event, store, &mut self.navigator) {
                    Dispatch::Handled { action, .. } => {
                        println!("{event}: handled ({})", serde_json::to_string(&action)?)
                    }
                    Dispatch::Ignored => println!("{event}: ignored"),
                }
            }
            SessionCommand::Attach => {
                if self.guard.is_none() {
                    self.guard = Some(self.surface.attach(self.bindings.clone()));
                }
                println!("keyboard: attached");
            }
            SessionCommand::Detach => {
                self.guard = None;
                println!("keyboard: detached");
            }
            SessionCommand::Reset => {
                store.reset();
                println!("state reset");
            }
            SessionCommand::Help => {
                println!("{HELP}\n\nshortcuts:");
                for shortcut in self.bindings.iter() {
                    println!("  cmd/ctrl+{}  {}", shortcut.key, shortcut.description);
                }
            }
            SessionCommand::Quit => return Ok(false),
        }
        Ok(true)
    }
}

fn print_crumbs(store: &WorkflowStore) {
    let trail: Vec<&str> = store
        .state()
        .breadcrumbs
        .iter()
        .map(|b| b.label.as_str())
        .collect();
    println!("breadcrumbs: {}", trail.join(" > "));
}

fn print_engagement(store: &WorkflowStore) {
    let m = &store.state().engagement_metrics;
    println!(
        "streak: {}  analyses: {}  syncs: {}  power: {}",
        m.current_streak, m.total_analyses, m.successful_syncs, m.power_user_actions
    );
}

pub fn run(root: &Path, open_browser: bool) -> anyhow::Result<()> {
    let (config, store) = open_store(root)?;
    let surface = KeyboardSurface::new();
    let bindings = ShortcutBindings::defaults(&config.routes);
    let guard = surface.attach(bindings.clone());

    let mut session = Session {
        store,
        surface: &surface,
        bindings,
        guard: Some(guard),
        navigator: CliNavigator::new(&config, open_browser),
    };

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let cmd = match SessionCommand::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                println!("error: {e:#}");
                continue;
            }
        };
        if !session.apply(cmd)? {
            break;
        }
    }

    drop(session);
    tracing::debug!(listening = surface.is_listening(), "session ended");
    Ok(())
}
