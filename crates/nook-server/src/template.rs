//! HTML assembly for the browser-facing pages.
//!
//! One shared page shell plus per-page content builders, kept as
//! plain format strings.

/// Render completer output to HTML.
pub fn render_markdown(text: &str) -> String {
    markdown::to_html(text)
}

/// The standard page shell: title, description, nav column, content.
pub fn page(title: &str, desc: &str, nav: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>{title} | Nook</title>
  <meta name="description" content="{desc}">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <style>
  body {{
    font-family: arial;
    font-size: 14px;
    color: darkslategray;
    margin: 0 auto;
    max-width: 1600px;
  }}
  a {{ color: black; text-decoration: none; }}
  button:hover {{ cursor: pointer; }}
  #nav {{
    position: fixed; top: 20px; background: white;
    padding: 10px 0; width: 20%;
    text-align: right;
  }}
  #content {{ height: 100%; width: 70%; margin-left: 30%; display: inline-block; }}
  .head {{ margin-right: 10px; font-weight: bold; display: block; margin-bottom: 20px; }}
  </style>
</head>
<body>
  <div id="nav">
    {nav}
  </div>
  <div id="content">{content}</div>
</body>
</html>
"#
    )
}

/// Nav column for the chat page: one anchor per standing channel.
fn chat_nav(channels: &[&str]) -> String {
    channels
        .iter()
        .map(|ch| format!(r##"<a href="#{ch}" class="head">{ch}</a>"##))
        .collect::<Vec<_>>()
        .join("\n      ")
}

/// The chat page: transcript for one channel plus the prompt form.
/// Messages alternate prompt/reply styling by position, matching how
/// the history is recorded.
pub fn chat_page(session_id: &str, channel: &str, messages: &[String]) -> String {
    let mut transcript = String::new();
    for (i, msg) in messages.iter().enumerate() {
        let class = if i % 2 == 0 { "message" } else { "message mu" };
        transcript.push_str(&format!(r#"<div class="{class}">{msg}</div>"#));
    }

    let content = format!(
        r##"<style>
      #prompt {{ width: calc(100% - 100px); padding: 10px; }}
      .message {{ padding: 10px 10px; }}
      .mu {{ background: #F8F8F8; border-radius: 10px; }}
      #text {{ height: calc(100% - 140px); overflow-y: scroll; padding-top: 50px; }}
    </style>

    <div id="text">{transcript}</div>

    <div id="input">
      <form id="form" action="/chat/prompt">
        <input id="uuid" name="uuid" type="hidden" value="{session_id}">
        <input id="prompt" name="prompt" placeholder="ask a question" autocomplete="off">
        <input id="channel" name="channel" type="hidden" value="{channel}">
        <button>submit</button>
      </form>
    </div>

    <script>
      var form = document.getElementById("form");
      var text = document.getElementById("text");

      form.addEventListener("submit", function(ev) {{
        ev.preventDefault();
        var prompt = form.elements["prompt"].value;
        form.elements["prompt"].value = '';
        text.innerHTML += "<div class='message mu'>" + prompt + "</div>";
        text.scrollTo(0, text.scrollHeight);

        var data = {{
          uuid: form.elements["uuid"].value,
          prompt: prompt,
          channel: form.elements["channel"].value,
          markdown: true
        }};

        fetch("/chat/prompt", {{
          method: "POST",
          body: JSON.stringify(data),
          headers: {{'Content-Type': 'application/json'}},
        }})
          .then(res => res.json())
          .then((rsp) => {{
            if (rsp.markdown === undefined) {{ return; }}
            var height = text.scrollHeight;
            text.innerHTML += "<div class=message>" + rsp.markdown + "</div>";
            text.scrollTo(0, height + 20);
          }});
        return false;
      }});

      window.addEventListener("hashchange", () => {{
        var hash = window.location.hash.replace("#", "");
        document.cookie = "channel=" + hash;
        window.location.reload();
      }}, false);

      text.scrollTo(0, text.scrollHeight);
    </script>
"##
    );

    page(
        "Chat",
        "Ask a question",
        &chat_nav(crate::service::DEFAULT_CHANNELS),
        &content,
    )
}

/// The channel listing page, names pre-sorted by the caller.
pub fn channels_page(names: &[String]) -> String {
    let mut html = String::from("<h1>Channels</h1>");
    for name in names {
        if name.is_empty() {
            continue;
        }
        html.push_str(&format!(r##"<a href="/#{name}">{name}</a><br>"##));
    }
    page("Channels", "List of channels", "", &html)
}
