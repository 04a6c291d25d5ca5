// This file contains the embedded sources for all HTML templates the server renders.
#![forbid(unsafe_code)]

// ========================= shared layout =========================
// Every page template extends this skeleton and fills in the two blocks.
pub const BASE_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{% block title %}Menagerie{% endblock title %}</title>
</head>
<body>
{% block content %}{% endblock content %}
</body>
</html>
"#;

// ========================= greeter pages =========================
// The named variant also shows the catalog; the include shares this
// template's context, so "items" must be present whenever it renders.
pub const HELLO_PAGE: &str = r#"{% extends "base.html" %}
{% block title %}Hello{% endblock title %}
{% block content %}
{% if name %}
  <h1>Welcome, {{ name }}</h1>
  <h2>Our current menagerie</h2>
  {% include "catalog.html" %}
{% else %}
  <h1>Welcome visitor!</h1>
{% endif %}
{% endblock content %}
"#;

pub const GREET_PAGE: &str = r#"{% extends "base.html" %}
{% block title %}Greetings{% endblock title %}
{% block content %}
  <h1>Welcome, {{ name | capitalize }}</h1>
{% endblock content %}
"#;

// ========================= catalog =========================
// The listing fragment renders an empty list for an empty catalog.
pub const CATALOG_LISTING: &str = r#"<ul class="catalog">
{% for item in items %}
  <li><img src="{{ item.image }}" alt="{{ item.title }}" width="120"> {{ item.title }}: {{ item.cost }}</li>
{% endfor %}
</ul>
"#;

pub const CATALOG_PAGE: &str = r#"{% extends "base.html" %}
{% block title %}Catalog{% endblock title %}
{% block content %}
  <h1>Menagerie catalog</h1>
  {% include "catalog.html" %}
{% endblock content %}
"#;

// ========================= form pages =========================
pub const FORM_PAGE: &str = r#"{% extends "base.html" %}
{% block title %}Form{% endblock title %}
{% block content %}
  <h1>Tell us about yourself</h1>
  <form method="post" action="/form">
    <label>Name <input type="text" name="name"></label>
    <label>Email <input type="text" name="email"></label>
    <button type="submit">Submit</button>
  </form>
{% endblock content %}
"#;

pub const FORM_RESULT_PAGE: &str = r#"{% extends "base.html" %}
{% block title %}Submission received{% endblock title %}
{% block content %}
  <h1>Submission received</h1>
{% if num_fields > 0 %}
  <ul class="fields">
{% for key, value in fields %}
    <li>{{ key }} = {{ value }}</li>
{% endfor %}
  </ul>
{% else %}
  <p>No fields were submitted.</p>
{% endif %}
{% endblock content %}
"#;

// ========================= christmas page =========================
pub const CHRISTMAS_PAGE: &str = r#"{% extends "base.html" %}
{% block title %}Is it Christmas?{% endblock title %}
{% block content %}
{% if christmas %}
  <h1>YES</h1>
{% else %}
  <h1>NO</h1>
{% endif %}
{% endblock content %}
"#;
