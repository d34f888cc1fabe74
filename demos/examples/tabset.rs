// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A closable tabset with an add control, driven by pointer clicks.
//!
//! This example shows how to combine:
//! - `understory_dom` for the element tree and its state markers,
//! - `understory_roles` to bind the `tabset` role declared in markup,
//! - `understory_responder` click recognition, fed through the host.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example tabset`

use kurbo::Point;
use tracing_subscriber::EnvFilter;
use understory_dom::{Document, Element, NodeId, state};
use understory_roles::Roles;
use understory_roles::tabset::{TAB, TABPANEL, Tabset, TabsetEvent, TabsetOptions};
use understory_roles::validate::{Validator, validate};

fn print_tabs(doc: &Document, tabset: &Tabset) {
    let line: Vec<String> = tabset
        .tabs()
        .map(|tab| {
            let title = doc.attribute(tab, "title").unwrap_or_default();
            if state::is_selected(doc, tab) {
                format!("[{title}]")
            } else {
                format!(" {title} ")
            }
        })
        .collect();
    println!("  tabs: {}", line.join("|"));
}

fn click(roles: &mut Roles, doc: &mut Document, target: NodeId, t: u64) {
    let at = Point::new(10.0, 10.0);
    roles.pointer_down(target, at, t);
    roles.pointer_up(doc, target, at, t + 30);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // <div role="tabset" data-tabset-closable>
    //   <ul role="tablist"> <li role="tab">…<button role="closetab"/></li> … <li role="addtab"/> </ul>
    //   <div role="tabpool"> <section role="tabpanel"/> … </div>
    // </div>
    let mut doc = Document::new();
    let body = doc.insert(None, Element::new("body"));
    let root = doc.insert(
        Some(body),
        Element::new("div")
            .with_role("tabset")
            .with_attr("data-tabset-closable", ""),
    );
    let bar = doc.insert(Some(root), Element::new("ul").with_role("tablist"));
    let pool = doc.insert(Some(root), Element::new("div").with_role("tabpool"));
    let mut headers = Vec::new();
    for (i, title) in ["Inbox", "Drafts", "Sent"].into_iter().enumerate() {
        let mut header = Element::new("li").with_role(TAB).with_attr("title", title);
        if i == 0 {
            header = header.with_attr("aria-selected", "true");
        }
        let header = doc.insert(Some(bar), header);
        doc.insert(Some(header), Element::new("button").with_role("closetab"));
        doc.insert(Some(pool), Element::new("section").with_role(TABPANEL));
        headers.push(header);
    }
    let add = doc.insert(Some(bar), Element::new("li").with_role("addtab"));

    let mut roles = Roles::default();
    let Some(&binding) = roles.auto(&mut doc, body, false).first() else {
        eprintln!("no tabset bound");
        return;
    };

    if let Some(tabset) = roles.get::<Tabset>(binding) {
        println!("bound from markup: {:?}", tabset.options());
    }

    // Hooks cannot come from markup: rebind with explicit options, tearing
    // the markup-configured binding down first so its listeners go away.
    let mut created = 0;
    let options = TabsetOptions::default()
        .closable(true)
        .create(move |doc, _, _, _| {
            created += 1;
            let title = format!("New {created}");
            let header = doc.insert(
                None,
                Element::new("li").with_role(TAB).with_attr("title", &title),
            );
            doc.insert(Some(header), Element::new("button").with_role("closetab"));
            let panel = doc.insert(None, Element::new("section").with_role(TABPANEL));
            Some((header, panel))
        })
        .on_close(|doc, header, _| doc.attribute(header, "title").as_deref() != Some("Inbox"));
    roles.unbind(&mut doc, binding);
    let binding = match roles.bind::<Tabset>(&mut doc, root, Some(options)) {
        Ok(binding) => binding,
        Err(err) => {
            eprintln!("cannot bind tabset: {err}");
            return;
        }
    };
    roles.with::<Tabset, _>(&mut doc, binding, |tabset, _| {
        tabset.events_mut().on(|event| match event {
            TabsetEvent::Selected { index, .. } => println!("  selected #{index}"),
            TabsetEvent::Closed { index, .. } => println!("  closed #{index}"),
            _ => {}
        });
    });

    let show = |roles: &Roles, doc: &Document| {
        if let Some(tabset) = roles.get::<Tabset>(binding) {
            print_tabs(doc, tabset);
        }
    };

    println!("initial");
    show(&roles, &doc);

    println!("click Sent");
    click(&mut roles, &mut doc, headers[2], 0);
    show(&roles, &doc);

    println!("click add");
    click(&mut roles, &mut doc, add, 100);
    show(&roles, &doc);

    println!("close Drafts");
    let drafts_close = doc.children_of(headers[1])[0];
    click(&mut roles, &mut doc, drafts_close, 200);
    show(&roles, &doc);

    println!("close Inbox (vetoed)");
    let inbox_close = doc.children_of(headers[0])[0];
    click(&mut roles, &mut doc, inbox_close, 300);
    show(&roles, &doc);

    // The validation primitive works on any element.
    let search = doc.insert(
        Some(body),
        Element::new("input")
            .with_attr("pattern", "^[a-z]+$")
            .with_attr("value", "Tabs!"),
    );
    let ok = validate(&mut doc, search, &Validator::Pattern);
    println!("search field valid: {ok}");
}
