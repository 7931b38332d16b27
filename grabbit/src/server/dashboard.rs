//! Dashboard page
//!
//! Server-rendered HTML view of the needed items with a small add form.
//! Actions call back into the JSON API under the same secret prefix.

use crate::config::DEFAULT_FOR_PERSON;
use crate::error::Result;
use crate::services::{Grabbit, ListQuery};
use crate::store::{Item, Priority};
use handlebars::Handlebars;
use serde_json::{json, Value};

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Grabbit</title>
<style>
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
       background: #1a1a2e; color: #eee; min-height: 100vh; padding: 20px; }
.container { max-width: 600px; margin: 0 auto; }
h1 { text-align: center; margin-bottom: 20px; }
.summary { display: flex; justify-content: center; gap: 20px; margin-bottom: 25px; }
.stat { text-align: center; background: rgba(255,255,255,0.05); padding: 15px 25px; border-radius: 12px; }
.stat .value { font-size: 1.8em; font-weight: bold; color: #4ecca3; }
.stat.urgent .value { color: #e94560; }
.stat .label { font-size: 0.85em; color: #888; }
.add-form { background: rgba(255,255,255,0.05); border-radius: 12px; padding: 20px; margin-bottom: 25px; }
.add-form input, .add-form select { width: 100%; margin-bottom: 10px; padding: 10px; border-radius: 8px;
       border: 1px solid rgba(255,255,255,0.1); background: rgba(255,255,255,0.1); color: #fff; }
.add-form button { width: 100%; padding: 12px; border: none; border-radius: 8px; background: #4ecca3;
       color: #1a1a2e; font-weight: bold; cursor: pointer; }
.stores { display: flex; flex-wrap: wrap; gap: 8px; justify-content: center; margin-bottom: 20px; }
.store { background: rgba(255,255,255,0.1); color: #ccc; padding: 6px 14px; border-radius: 20px; font-size: 0.9em; }
.items { display: flex; flex-direction: column; gap: 10px; }
.item { display: flex; background: rgba(255,255,255,0.05); border-radius: 12px; overflow: hidden; }
.bar { width: 5px; flex-shrink: 0; }
.content { flex: 1; padding: 15px; }
.badge { background: #0f3460; color: #aaa; padding: 3px 10px; border-radius: 12px; font-size: 0.8em; margin-left: 8px; }
.notes { color: #888; font-size: 0.9em; margin-top: 5px; }
.actions { display: flex; flex-direction: column; justify-content: center; gap: 5px; padding: 10px; }
.actions button { width: 36px; height: 36px; border: none; border-radius: 8px; cursor: pointer;
       background: rgba(255,255,255,0.1); color: #fff; }
.empty { text-align: center; color: #666; padding: 40px; }
</style>
</head>
<body>
<div class="container">
<h1>Grabbit</h1>
<div class="summary">
<div class="stat"><div class="value">{{summary.total_needed}}</div><div class="label">To Grab</div></div>
<div class="stat urgent"><div class="value">{{summary.urgent}}</div><div class="label">Urgent</div></div>
<div class="stat"><div class="value">{{summary.total_bought}}</div><div class="label">Grabbed</div></div>
</div>
<div class="add-form">
<input type="text" id="item-input" placeholder="What do you need to grab?">
<input type="text" id="store-input" placeholder="Store (optional)">
<select id="priority-input">
<option value="medium">Medium</option>
<option value="low">Low</option>
<option value="high">High</option>
<option value="urgent">Urgent</option>
</select>
<button onclick="addItem()">Grab It!</button>
</div>
<div class="stores">
{{#each stores}}<span class="store">{{name}} ({{count}})</span>{{/each}}
</div>
<div class="items">
{{#each items}}
<div class="item" data-id="{{id}}" data-priority="{{priority}}">
<div class="bar" style="background: {{color}}"></div>
<div class="content"><span>{{name}}</span>
{{#if store}}<span class="badge">{{store}}</span>{{/if}}
{{#if person}}<span class="badge">for {{person}}</span>{{/if}}
{{#if notes}}<div class="notes">{{notes}}</div>{{/if}}
</div>
<div class="actions">
<button onclick="markBought('{{id}}')" title="Mark bought">&#10003;</button>
<button onclick="archiveItem('{{id}}')" title="Archive">&#8617;</button>
</div>
</div>
{{else}}
<div class="empty">Nothing to grab! Your list is empty.</div>
{{/each}}
</div>
</div>
<script>
const SECRET = "{{secret}}";
async function api(endpoint, data) {
  const res = await fetch("/" + SECRET + "/api" + endpoint, {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(data),
  });
  return res.json();
}
async function addItem() {
  const item = document.getElementById("item-input").value.trim();
  if (!item) return;
  const store = document.getElementById("store-input").value.trim() || null;
  const priority = document.getElementById("priority-input").value;
  await api("/add", { item, store, priority });
  location.reload();
}
async function markBought(id) { await api("/mark_bought", { id }); location.reload(); }
async function archiveItem(id) { await api("/archive", { id }); location.reload(); }
document.getElementById("item-input").addEventListener("keypress", (e) => {
  if (e.key === "Enter") addItem();
});
</script>
</body>
</html>"#;

/// Render the dashboard for the current list
pub async fn render(grabbit: &Grabbit, secret: &str) -> Result<String> {
    let context = context(grabbit, secret).await;
    let handlebars = Handlebars::new();
    Ok(handlebars.render_template(TEMPLATE, &context)?)
}

/// Template data built from the summary, stores and needed-item responses
async fn context(grabbit: &Grabbit, secret: &str) -> Value {
    let summary = grabbit.summary().await;
    let stores = grabbit.stores().await;
    let needed = grabbit.list(ListQuery::default()).await;

    let stores: Vec<Value> = stores
        .stores
        .iter()
        .map(|(name, count)| json!({ "name": name, "count": count }))
        .collect();
    let items: Vec<Value> = needed.items.iter().map(item_context).collect();

    json!({
        "summary": summary,
        "stores": stores,
        "items": items,
        "secret": secret,
    })
}

fn item_context(item: &Item) -> Value {
    let person = (item.for_person != DEFAULT_FOR_PERSON).then_some(item.for_person.as_str());

    json!({
        "id": item.id,
        "name": item.item,
        "priority": item.priority,
        "color": priority_color(item.priority),
        "store": item.store,
        "person": person,
        "notes": item.notes,
    })
}

fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::Urgent => "#e94560",
        Priority::High => "#f39c12",
        Priority::Medium => "#4ecca3",
        Priority::Low => "#888",
    }
}
