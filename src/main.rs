use anyhow::anyhow;
use eframe::egui;
use egui::{Color32, CornerRadius, RichText, ScrollArea, Stroke, Ui, ViewportBuilder};
use std::sync::Arc;
use std::time::Duration;

mod app;
mod config;
mod db;
mod fetch;
mod history;
mod hn_client;
mod models;
mod search;
mod sort;
mod stories;

use crate::app::HackerStories;
use crate::config::Config;
use crate::db::{Database, KeyValueStore, MemoryStore};
use crate::hn_client::HackerNewsClient;
use crate::models::Story;
use crate::sort::SortKey;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Failed to load config, using defaults: {:#}", e);
            Config::default()
        }
    };

    // Without a database the term just isn't remembered across runs
    let store: Arc<dyn KeyValueStore> = match Database::new(config.data_dir.as_deref()) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            log::error!("Failed to open settings database: {:#}", e);
            Arc::new(MemoryStore::new())
        }
    };

    let client = Arc::new(HackerNewsClient::new(config.request_timeout())?);

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([1000.0, 760.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Hacker Stories"),
        ..Default::default()
    };

    eframe::run_native(
        "Hacker Stories",
        options,
        Box::new(move |_cc| {
            let stories = HackerStories::new(
                &config.api_base,
                client,
                store,
                &config.search_storage_key,
                &config.default_search_term,
            );
            Ok(Box::new(HackerStoriesWindow::new(stories)))
        }),
    )
    .map_err(|e| anyhow!("Failed to run window: {}", e))
}

struct AppTheme {
    background: Color32,
    card_background: Color32,
    text: Color32,
    secondary_text: Color32,
    highlight: Color32,
    separator: Color32,
    error: Color32,
    score_high: Color32,
    score_medium: Color32,
    score_low: Color32,
    button_background: Color32,
    button_foreground: Color32,
    button_active_background: Color32,
    button_hover_background: Color32,
}

impl AppTheme {
    fn dark() -> Self {
        Self {
            background: Color32::from_rgb(18, 18, 18),
            card_background: Color32::from_rgb(30, 30, 30),
            text: Color32::from_rgb(240, 240, 240),
            secondary_text: Color32::from_rgb(180, 180, 180),
            highlight: Color32::from_rgb(255, 102, 0), // HN orange
            separator: Color32::from_rgb(60, 60, 60),
            error: Color32::from_rgb(239, 83, 80),
            score_high: Color32::from_rgb(76, 175, 80),
            score_medium: Color32::from_rgb(255, 193, 7),
            score_low: Color32::from_rgb(158, 158, 158),
            button_background: Color32::from_rgb(66, 66, 66),
            button_foreground: Color32::from_rgb(240, 240, 240),
            button_active_background: Color32::from_rgb(255, 102, 0),
            button_hover_background: Color32::from_rgb(80, 80, 80),
        }
    }

    fn light() -> Self {
        Self {
            background: Color32::from_rgb(245, 245, 245),
            card_background: Color32::from_rgb(255, 255, 255),
            text: Color32::from_rgb(20, 20, 20),
            secondary_text: Color32::from_rgb(90, 90, 90),
            highlight: Color32::from_rgb(235, 92, 0),
            separator: Color32::from_rgb(200, 200, 200),
            error: Color32::from_rgb(198, 40, 40),
            score_high: Color32::from_rgb(30, 110, 40),
            score_medium: Color32::from_rgb(190, 130, 0),
            score_low: Color32::from_rgb(80, 80, 80),
            button_background: Color32::from_rgb(235, 235, 235),
            button_foreground: Color32::from_rgb(20, 20, 20),
            button_active_background: Color32::from_rgb(235, 92, 0),
            button_hover_background: Color32::from_rgb(210, 210, 210),
        }
    }

    fn apply_to_ctx(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        style.visuals.panel_fill = self.background;
        style.visuals.window_fill = self.card_background;
        style.visuals.window_stroke = Stroke::new(1.0, self.separator);
        style.visuals.widgets.noninteractive.bg_fill = self.card_background;
        style.visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text);

        style.visuals.widgets.inactive.bg_fill = self.button_background;
        style.visuals.widgets.inactive.weak_bg_fill = self.button_background;
        style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.button_foreground);
        style.visuals.widgets.active.bg_fill = self.button_active_background;
        style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.button_foreground);
        style.visuals.widgets.hovered.bg_fill = self.button_hover_background;
        style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.button_foreground);

        style.visuals.selection.bg_fill = self.highlight;
        style.visuals.selection.stroke = Stroke::new(1.0, self.highlight);

        style.visuals.window_corner_radius = CornerRadius::same(8);
        style.visuals.widgets.noninteractive.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.inactive.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.hovered.corner_radius = CornerRadius::same(4);
        style.visuals.widgets.active.corner_radius = CornerRadius::same(4);

        ctx.set_style(style);
    }

    fn score_color(&self, points: u32) -> Color32 {
        if points >= 300 {
            self.score_high
        } else if points >= 100 {
            self.score_medium
        } else {
            self.score_low
        }
    }
}

/// User input gathered while drawing, applied once the frame is laid out.
enum UiAction {
    SearchInput(String),
    SearchSubmit,
    LastSearch(String),
    Sort(SortKey),
    Remove(Story),
    More,
    ToggleTheme,
}

struct HackerStoriesWindow {
    stories: HackerStories,
    search_input: String,
    theme: AppTheme,
    is_dark_mode: bool,
}

impl HackerStoriesWindow {
    fn new(stories: HackerStories) -> Self {
        let search_input = stories.search_term().to_string();
        Self {
            stories,
            search_input,
            theme: AppTheme::dark(),
            is_dark_mode: true,
        }
    }

    fn open_link(&self, url: &str) {
        if let Err(e) = open::that(url) {
            log::warn!("Failed to open URL {}: {}", url, e);
        }
    }

    fn toggle_theme(&mut self) {
        self.is_dark_mode = !self.is_dark_mode;
        self.theme = if self.is_dark_mode {
            AppTheme::dark()
        } else {
            AppTheme::light()
        };
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::SearchInput(term) => self.stories.handle_search_input(&term),
            UiAction::SearchSubmit => self.stories.handle_search_submit(),
            UiAction::LastSearch(term) => {
                self.stories.handle_last_search(&term);
                self.search_input = term;
            }
            UiAction::Sort(key) => self.stories.handle_sort(key),
            UiAction::Remove(story) => self.stories.handle_remove_story(&story),
            UiAction::More => self.stories.handle_more(),
            UiAction::ToggleTheme => self.toggle_theme(),
        }
    }

    fn render_header(&self, ui: &mut Ui, actions: &mut Vec<UiAction>) {
        ui.horizontal(|ui| {
            ui.heading(
                RichText::new("My Hacker Stories")
                    .color(self.theme.highlight)
                    .size(24.0),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let label = if self.is_dark_mode { "Light" } else { "Dark" };
                if ui.button(label).clicked() {
                    actions.push(UiAction::ToggleTheme);
                }
            });
        });
    }

    fn render_search_form(&mut self, ui: &mut Ui, actions: &mut Vec<UiAction>) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Search:").strong().color(self.theme.text));

            let input = ui.add(
                egui::TextEdit::singleline(&mut self.search_input)
                    .desired_width(320.0)
                    .hint_text("Search stories"),
            );
            if input.changed() {
                actions.push(UiAction::SearchInput(self.search_input.clone()));
            }

            let enter = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let can_submit = !self.search_input.is_empty();
            let submit = ui.add_enabled(can_submit, egui::Button::new("Submit"));
            if can_submit && (submit.clicked() || enter) {
                actions.push(UiAction::SearchSubmit);
            }
        });
    }

    fn render_last_searches(&self, ui: &mut Ui, actions: &mut Vec<UiAction>) {
        let last_searches = self.stories.last_searches();
        if last_searches.is_empty() {
            return;
        }

        ui.horizontal_wrapped(|ui| {
            for term in last_searches {
                if ui.button(term.as_str()).clicked() {
                    actions.push(UiAction::LastSearch(term));
                }
            }
        });
    }

    fn render_sort_header(&self, ui: &mut Ui, actions: &mut Vec<UiAction>) {
        let sort = self.stories.sort();
        ui.horizontal(|ui| {
            for key in [SortKey::Title, SortKey::Author, SortKey::Comments, SortKey::Points] {
                let mut label = key.label().to_string();
                if sort.key == key {
                    label.push_str(if sort.is_reverse { " ▲" } else { " ▼" });
                }
                let color = if sort.key == key {
                    self.theme.highlight
                } else {
                    self.theme.button_foreground
                };
                if ui.button(RichText::new(label).color(color)).clicked() {
                    actions.push(UiAction::Sort(key));
                }
            }
        });
    }

    fn render_story(&self, ui: &mut Ui, story: &Story, actions: &mut Vec<UiAction>) {
        egui::Frame::new()
            .fill(self.theme.card_background)
            .corner_radius(CornerRadius::same(8))
            .stroke(Stroke::new(1.0, self.theme.separator))
            .inner_margin(10.0)
            .outer_margin(egui::vec2(4.0, 3.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let title = ui.add(
                        egui::Label::new(
                            RichText::new(&story.title)
                                .color(self.theme.text)
                                .size(16.0)
                                .strong(),
                        )
                        .sense(egui::Sense::click()),
                    );
                    if title.clicked() && !story.url.is_empty() {
                        self.open_link(&story.url);
                    }
                    if title.hovered() && !story.url.is_empty() {
                        ui.output_mut(|o| o.cursor_icon = egui::CursorIcon::PointingHand);
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("✔").on_hover_text("Dismiss").clicked() {
                            actions.push(UiAction::Remove(story.clone()));
                        }
                        ui.label(
                            RichText::new(format!("{} pts", story.point_count))
                                .color(self.theme.score_color(story.point_count))
                                .strong(),
                        );
                    });
                });

                ui.horizontal(|ui| {
                    ui.label(RichText::new("by").color(self.theme.secondary_text));
                    ui.label(RichText::new(&story.author).color(self.theme.text));
                    ui.add_space(8.0);
                    ui.label(
                        RichText::new(format!("{} comments", story.comment_count))
                            .color(self.theme.secondary_text),
                    );
                });
            });
    }

    fn render_footer(&self, ui: &mut Ui, actions: &mut Vec<UiAction>) {
        let state = self.stories.stories();
        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            if state.is_loading {
                ui.label(RichText::new("Loading ...").color(self.theme.secondary_text));
            } else if state.has_more() && ui.button("More").clicked() {
                actions.push(UiAction::More);
            }
        });
        ui.add_space(8.0);
    }
}

impl eframe::App for HackerStoriesWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.theme.apply_to_ctx(ctx);

        self.stories.poll();
        if self.stories.stories().is_loading {
            // Workers can't wake the UI, so keep checking while one is out
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        let mut actions = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_header(ui, &mut actions);
            ui.add_space(8.0);
            self.render_search_form(ui, &mut actions);
            self.render_last_searches(ui, &mut actions);

            ui.label(
                RichText::new(format!("Search Term is: {}", self.stories.search_term()))
                    .color(self.theme.secondary_text),
            );

            if self.stories.stories().is_error {
                ui.label(RichText::new("Something went wrong ...").color(self.theme.error));
            }

            ui.separator();
            self.render_sort_header(ui, &mut actions);

            ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
                for story in self.stories.sorted_stories() {
                    self.render_story(ui, story, &mut actions);
                }
                self.render_footer(ui, &mut actions);
            });
        });

        for action in actions {
            self.apply(action);
        }
    }
}
