use maud::{html, Markup, DOCTYPE};

use crate::{models::Todo, status::StatusMessage};

pub const DELETE_PROMPT: &str = "Delete this todo?";
pub const CLEAR_PROMPT: &str = "Clear all stored todos?";

// === Page ===
pub fn page(todos: &[Todo], status: Option<&StatusMessage>, fetch_limit: usize) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "Todo Cache" }
                script src="https://unpkg.com/htmx.org@1.9.10" {}
                script src="https://cdn.tailwindcss.com" {}
                style { ".title.completed { text-decoration: line-through; color: #888; }" }
            }
            body class="bg-gray-100 font-sans leading-normal tracking-normal" {
                div class="container mx-auto p-8" {
                    h1 class="text-4xl text-center text-gray-700 mb-6" { "Todo Cache" }
                    (controls_html(fetch_limit))
                    (status_html(status, false))
                    (todos_html(todos))
                }
            }
        }
    }
}

// === Components ===
fn controls_html(fetch_limit: usize) -> Markup {
    html! {
        div class="flex gap-2" {
            button id="fetchAndSaveBtn" class="bg-blue-500 hover:bg-blue-700 text-white font-bold py-2 px-4 rounded"
                hx-post="/fetch" hx-target="#todos" hx-swap="outerHTML" {
                "Fetch & Save First " (fetch_limit)
            }
            button id="loadBtn" class="bg-gray-500 hover:bg-gray-700 text-white font-bold py-2 px-4 rounded"
                hx-get="/todos" hx-target="#todos" hx-swap="outerHTML" { "Load From Storage" }
            button id="clearAllBtn" class="bg-red-500 hover:bg-red-700 text-white font-bold py-2 px-4 rounded"
                hx-post="/clear" hx-target="#todos" hx-swap="outerHTML" hx-confirm=(CLEAR_PROMPT)
                hx-vals=(serde_json::json!({ "confirmed": true })) { "Clear All" }
        }
    }
}

/// Transient status line. Polls itself so expiry shows without user action.
pub fn status_html(status: Option<&StatusMessage>, oob: bool) -> Markup {
    let is_error = status.is_some_and(|s| s.is_error);
    html! {
        div id="status"
            class=(if is_error { "my-4 h-6 error" } else { "my-4 h-6" })
            style=[is_error.then_some("color: #b22222")]
            hx-get="/status" hx-trigger="every 1s" hx-swap="outerHTML"
            hx-swap-oob=[oob.then_some("true")] {
            @if let Some(status) = status {
                (status.text)
            }
        }
    }
}

// a single row in the todo list
fn todo_html(todo: &Todo) -> Markup {
    let id = todo.id.as_str();
    html! {
        li class="todo-item flex items-center bg-white rounded-lg shadow-lg my-2 py-2 px-4" data-id=(id) {
            div class="left flex-grow flex items-center" {
                input type="checkbox" class="mr-2" checked[todo.completed]
                    hx-post="/toggle_todo" hx-target="#todos" hx-swap="outerHTML"
                    hx-vals=(serde_json::json!({ "id": id, "completed": !todo.completed }));
                div.title.completed[todo.completed] { (todo.title) }
            }
            div class="actions flex gap-2" {
                button class="btn-toggle bg-gray-300 hover:bg-gray-400 py-1 px-2 rounded"
                    hx-post="/toggle_todo" hx-target="#todos" hx-swap="outerHTML"
                    hx-vals=(serde_json::json!({ "id": id, "completed": !todo.completed })) {
                    @if todo.completed { "Mark Incomplete" } @else { "Mark Complete" }
                }
                button class="btn-delete bg-red-500 hover:bg-red-700 text-white font-bold py-1 px-2 rounded"
                    hx-post="/remove_todo" hx-target="#todos" hx-swap="outerHTML" hx-confirm=(DELETE_PROMPT)
                    hx-vals=(serde_json::json!({ "id": id, "confirmed": true })) { "Delete" }
            }
        }
    }
}

/// The whole list, rebuilt from scratch on every call.
pub fn todos_html(todos: &[Todo]) -> Markup {
    html! {
        div id="todos" class="mt-6" {
            p id="empty-msg" class="text-gray-500" style=(if todos.is_empty() { "display: block" } else { "display: none" }) {
                "No todos stored. Fetch some first."
            }
            ul id="todosList" class="list-none p-0" {
                @for todo in todos {
                    (todo_html(todo))
                }
            }
        }
    }
}
