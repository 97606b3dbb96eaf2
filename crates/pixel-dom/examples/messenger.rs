//! Compiles a small messenger-style view and prints the resulting tree as
//! HTML, along with the mount log and any diagnostics.
//!
//! Run with: `cargo run --example messenger -p pixel-dom`

use pixel_dom::{
    render_html, ComponentFactory, ComponentModel, Pixel, RecordingDom,
};
use serde_json::json;

fn search_input() -> ComponentModel {
    ComponentModel {
        template: r#"
    <div class="search">
      <input class="search_control" p:name="name" p:placeholder="placeholder" e:input="props.on_input"/>
    </div>
    "#
        .into(),
        used_props: vec!["name".into(), "placeholder".into()],
        ..Default::default()
    }
}

fn chat_item() -> ComponentModel {
    ComponentModel {
        template: r#"
    <li class="chat">
      <span class="chat_title">{{title}}</span>
      <span class="chat_preview">{{preview}}</span>
    </li>
    "#
        .into(),
        ..Default::default()
    }
}

fn chat_list() -> ComponentModel {
    ComponentModel {
        components: vec![
            ("SearchInput".to_string(), search_input as ComponentFactory),
            ("ChatItem".to_string(), chat_item as ComponentFactory),
        ],
        state: json!({
            "chats": [
                {"title": "Ada", "preview": "see you tomorrow :smile:"},
                {"title": "Brian", "preview": "draft is ready"},
                {"title": "Cleo", "preview": "thanks! :heart:"}
            ]
        })
        .as_object()
        .cloned()
        .expect("state object"),
        template: r#"
    <aside class="chats">
      <form class="search_form" e:submit="filter_chats">
        <SearchInput s:name="search" s:placeholder="Search"/>
      </form>
      <ul class="chats_list">
        <ChatItem loop:chats />
      </ul>
    </aside>
    "#
        .into(),
        ..Default::default()
    }
}

fn main() {
    let mut pixel = Pixel::new();
    pixel.register_component("ChatList", chat_list);

    let mut dom = RecordingDom::new();
    let view = match pixel.compile("<ChatList/>", &mut dom) {
        Ok(view) => view,
        Err(err) => {
            eprintln!("compile failed: {err}");
            std::process::exit(1);
        }
    };

    println!("{}", render_html(&view.tree, view.root));
    println!();
    println!("mounted {} nodes", dom.mount_count());
    for diagnostic in &view.diagnostics {
        println!("[{:?}] {}: {}", diagnostic.level, diagnostic.code, diagnostic.message);
    }
}
