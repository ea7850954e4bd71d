//! HTML served to the viewer and the peer.
//!
//! Pages are self-contained: the viewer page opens `watch` over WebSocket
//! and paints image envelopes, the ink page posts canvas PNGs to `ink-submit`.

use ink_common::Token;

const PAIRING_TITLE: &str = "Hello, Please scan the QR code.";

/// Viewer page shown after a pairing request.
pub fn pairing_page(token: &Token) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; text-align: center; }}
#drawing {{ max-width: 90vw; border: 1px solid #ccc; }}
#status {{ color: #666; }}
</style>
</head>
<body data-token="{token}">
<h1>{title}</h1>
<img id="qrcode" src="qrcode?token={token}" alt="pairing QR code">
<p id="status">waiting for connection...</p>
<img id="drawing" alt="">
<script>
const token = document.body.dataset.token;
const proto = location.protocol === "https:" ? "wss:" : "ws:";
const base = location.pathname.replace(/\/index$/, "");
const ws = new WebSocket(proto + "//" + location.host + base + "/watch?token=" + encodeURIComponent(token));
const status = document.getElementById("status");
ws.onopen = () => {{ status.textContent = "connected"; }};
ws.onclose = () => {{ status.textContent = "disconnected"; }};
ws.onmessage = (event) => {{
  const envelope = JSON.parse(event.data);
  if (envelope.type === 2) {{
    document.getElementById("drawing").src = "data:image/png;base64," + envelope.data;
  }} else {{
    status.textContent = envelope.data;
  }}
}};
</script>
</body>
</html>
"#,
        title = PAIRING_TITLE,
        token = token,
    )
}

/// Drawing page opened by the peer after scanning the QR code.
pub fn ink_page() -> &'static str {
    r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1, user-scalable=no">
<title>Draw</title>
<style>
body { margin: 0; font-family: sans-serif; text-align: center; }
canvas { border: 1px solid #ccc; touch-action: none; background: #fff; }
</style>
</head>
<body>
<canvas id="pad" width="320" height="320"></canvas>
<p><button id="clear">Clear</button> <button id="send">Send</button></p>
<p id="status"></p>
<script>
const token = new URLSearchParams(location.search).get("token") || "";
const pad = document.getElementById("pad");
const ctx = pad.getContext("2d");
ctx.lineWidth = 3;
ctx.lineCap = "round";
let drawing = false;
const point = (e) => {
  const r = pad.getBoundingClientRect();
  return [e.clientX - r.left, e.clientY - r.top];
};
pad.addEventListener("pointerdown", (e) => { drawing = true; ctx.beginPath(); ctx.moveTo(...point(e)); });
pad.addEventListener("pointermove", (e) => { if (drawing) { ctx.lineTo(...point(e)); ctx.stroke(); } });
window.addEventListener("pointerup", () => { drawing = false; });
document.getElementById("clear").onclick = () => ctx.clearRect(0, 0, pad.width, pad.height);
document.getElementById("send").onclick = () => {
  pad.toBlob((blob) => {
    fetch("ink-submit?token=" + encodeURIComponent(token), { method: "POST", body: blob })
      .then((res) => res.text())
      .then((text) => { document.getElementById("status").textContent = text; });
  }, "image/png");
};
</script>
</body>
</html>
"#
}
