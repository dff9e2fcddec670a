//! HTML documents for the diagram panels.
//!
//! Both pages are self-contained: the raster page embeds the image as a
//! base64 data URI, the interactive page carries the Mermaid source inline
//! and loads the renderer plus pan/zoom support from a CDN.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

const MERMAID_CDN: &str = "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.esm.min.mjs";
const PAN_ZOOM_CDN: &str = "https://cdn.jsdelivr.net/npm/svg-pan-zoom@3.6.1/dist/svg-pan-zoom.min.js";

/// `data:` URI embedding the raster image bytes.
pub fn data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

/// Static page showing one rendered UML image.
pub fn raster_page(png: &[u8]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>INTERLIS UML</title>
    <style>
        body {{
            padding: 10px;
            background-color: var(--vscode-editor-background);
        }}
        img {{
            max-width: 100%;
            background-color: white;
        }}
    </style>
</head>
<body>
    <img src="{}" alt="UML diagram">
</body>
</html>"#,
        data_uri(png)
    )
}

/// Interactive page rendering a Mermaid diagram with pan/zoom, a
/// download-as-PNG action and a copy-source action.
///
/// The diagram text is embedded verbatim; the remote service is trusted to
/// return well-formed Mermaid source.
pub fn mermaid_page(diagram: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>INTERLIS UML</title>
    <style>
        body {{
            font-family: var(--vscode-font-family);
            padding: 10px;
            background-color: var(--vscode-editor-background);
            color: var(--vscode-editor-foreground);
        }}
        #toolbar {{
            margin-bottom: 10px;
        }}
        #toolbar button {{
            background-color: var(--vscode-button-background);
            color: var(--vscode-button-foreground);
            border: none;
            padding: 4px 10px;
            margin-right: 6px;
            cursor: pointer;
        }}
        #diagram {{
            height: calc(100vh - 60px);
            background-color: white;
        }}
        #diagram svg {{
            width: 100%;
            height: 100%;
        }}
    </style>
</head>
<body>
    <div id="toolbar">
        <button id="download">Download PNG</button>
        <button id="copy">Copy source</button>
    </div>
    <div id="diagram">
        <pre class="mermaid">{diagram}</pre>
    </div>
    <script src="{pan_zoom}"></script>
    <script type="module">
        import mermaid from '{mermaid}';
        const source = document.querySelector('.mermaid').textContent;
        mermaid.initialize({{ startOnLoad: false }});
        await mermaid.run();
        const svg = document.querySelector('#diagram svg');
        svgPanZoom(svg, {{ controlIconsEnabled: true, fit: true, center: true }});

        document.getElementById('copy').addEventListener('click', () => {{
            navigator.clipboard.writeText(source);
        }});

        document.getElementById('download').addEventListener('click', () => {{
            const data = new XMLSerializer().serializeToString(svg);
            const image = new Image();
            image.onload = () => {{
                const canvas = document.createElement('canvas');
                canvas.width = image.width * 2;
                canvas.height = image.height * 2;
                const context = canvas.getContext('2d');
                context.fillStyle = 'white';
                context.fillRect(0, 0, canvas.width, canvas.height);
                context.drawImage(image, 0, 0, canvas.width, canvas.height);
                const link = document.createElement('a');
                link.download = 'diagram.png';
                link.href = canvas.toDataURL('image/png');
                link.click();
            }};
            image.src = 'data:image/svg+xml;base64,' + btoa(unescape(encodeURIComponent(data)));
        }});
    </script>
</body>
</html>"##,
        diagram = diagram,
        pan_zoom = PAN_ZOOM_CDN,
        mermaid = MERMAID_CDN,
    )
}
