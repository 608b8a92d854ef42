#[cfg(test)]
mod tests {
    use serde_json::json;
    use ticket_context::messaging::handle_message;
    use ticket_context::{extract_context, ContextSource, EventContext, PageSnapshot};

    fn extract(html: &str, url: Option<&str>) -> (ContextSource, EventContext) {
        let page = PageSnapshot::from_html(html, url);
        let result = extract_context(&page);
        assert!(result.ok);
        (result.source, result.context)
    }

    #[test]
    fn test_jsonld_event_page() {
        let html = r#"<html><head>
            <title>Foo Fighters | Acme Arena</title>
            <script type="application/ld+json">
            {
              "@context": "https://schema.org",
              "@type": "Event",
              "name": "Foo Fighters at Acme Arena",
              "startDate": "2025-11-02T19:30:00",
              "location": {"address": {"addressLocality": "Austin", "addressRegion": "TX"}}
            }
            </script>
        </head><body><h1>Foo Fighters</h1></body></html>"#;

        let (source, ctx) = extract(html, Some("https://www.acmearena.com/events/foo-fighters"));
        assert_eq!(source, ContextSource::JsonldEvent);
        assert_eq!(ctx.date_day.as_deref(), Some("2025-11-02"));
        assert_eq!(ctx.time_24.as_deref(), Some("19:30"));
        assert_eq!(ctx.city.as_deref(), Some("Austin"));
        assert_eq!(ctx.state.as_deref(), Some("TX"));
        assert_eq!(ctx.raw_title.as_deref(), Some("Foo Fighters at Acme Arena"));
    }

    #[test]
    fn test_stubhub_url_slug() {
        let html = "<html><head><title></title></head><body></body></html>";
        let (source, ctx) = extract(
            html,
            Some("https://www.stubhub.com/foo-fighters-austin-tickets-11-2-2025/event/123"),
        );
        assert_eq!(source, ContextSource::StubhubMerge);
        assert_eq!(ctx.date_day.as_deref(), Some("2025-11-02"));
        assert_eq!(ctx.performer_query.as_deref(), Some("Foo Fighters"));
        assert_eq!(ctx.city.as_deref(), Some("Austin"));
        assert_eq!(ctx.state, None);
        assert_eq!(ctx.time_24, None);
    }

    #[test]
    fn test_stubhub_multi_word_city_and_time_fallback() {
        let html = r#"<html><head>
            <title>Chris Stapleton Tickets</title>
            <meta property="og:description" content="Thursday night show, doors at 6:45 PM">
        </head><body><p>Buy now</p></body></html>"#;
        let (source, ctx) = extract(
            html,
            Some("https://www.stubhub.com/chris-stapleton-salt-lake-city-tickets-3-12-2026/event/105"),
        );
        assert_eq!(source, ContextSource::StubhubMerge);
        assert_eq!(ctx.performer_query.as_deref(), Some("Chris Stapleton"));
        assert_eq!(ctx.city.as_deref(), Some("Salt Lake City"));
        assert_eq!(ctx.date_day.as_deref(), Some("2026-03-12"));
        assert_eq!(ctx.time_24.as_deref(), Some("18:45"));
        assert_eq!(ctx.raw_title.as_deref(), Some("Chris Stapleton Tickets"));
    }

    #[test]
    fn test_ticketmaster_title_fallback() {
        let html = "<html><head><title>Adele | Mar 5, 2026 Los Angeles, CA</title></head><body></body></html>";
        let (source, ctx) = extract(html, Some("https://www.ticketmaster.com/adele/event/0B00"));
        assert_eq!(source, ContextSource::TicketmasterTitle);
        assert_eq!(ctx.date_day.as_deref(), Some("2026-03-05"));
        assert_eq!(ctx.city.as_deref(), Some("Los Angeles"));
        assert_eq!(ctx.state.as_deref(), Some("CA"));
    }

    #[test]
    fn test_heading_only_document() {
        let (source, ctx) = extract("<html><body><h1>Some Show</h1></body></html>", None);
        assert_eq!(source, ContextSource::Fallback);
        assert_eq!(ctx, EventContext::titled(Some("Some Show".to_string())));
    }

    #[test]
    fn test_empty_document() {
        let (source, ctx) = extract("", None);
        assert_eq!(source, ContextSource::Fallback);
        assert_eq!(ctx, EventContext::default());

        let (source, ctx) = extract("<html></html>", Some("not a url"));
        assert_eq!(source, ContextSource::Fallback);
        assert_eq!(ctx, EventContext::default());
    }

    #[test]
    fn test_next_data_on_marketplace_page() {
        let html = r#"<html><head><title>Hamilton Tickets | viagogo</title>
            <script id="__NEXT_DATA__" type="application/json">
            {"props": {"pageProps": {"event": {
                "name": "Hamilton",
                "startDate": "2026-04-18T20:00:00",
                "venueName": "Orpheum Theatre",
                "city": "Minneapolis",
                "state": "MN"
            }}}}
            </script>
        </head><body><h1>Hamilton Tickets</h1></body></html>"#;
        let (source, ctx) = extract(html, Some("https://www.viagogo.com/Theater-Tickets/Hamilton/E-1"));
        assert_eq!(source, ContextSource::NextdataEventlike);
        assert_eq!(ctx.performer_query.as_deref(), Some("Hamilton Orpheum Theatre"));
        assert_eq!(ctx.venue_name.as_deref(), Some("Orpheum Theatre"));
        assert_eq!(ctx.city.as_deref(), Some("Minneapolis"));
        assert_eq!(ctx.state.as_deref(), Some("MN"));
        assert_eq!(ctx.date_day.as_deref(), Some("2026-04-18"));
        assert_eq!(ctx.time_24.as_deref(), Some("20:00"));
    }

    #[test]
    fn test_viagogo_text_when_no_structured_data() {
        let html = r#"<html><head>
            <title>Hamilton Tickets | viagogo</title>
            <meta name="description" content="Hamilton on Apr 18, 2026 8:00 PM at Orpheum Theatre in Minneapolis, MN">
        </head><body><h1>Hamilton Tickets</h1></body></html>"#;
        let (source, ctx) = extract(html, Some("https://www.viagogo.com/Theater-Tickets/Hamilton/E-1"));
        assert_eq!(source, ContextSource::ViagogoSmart);
        assert_eq!(ctx.performer_query.as_deref(), Some("Hamilton Orpheum Theatre"));
        assert_eq!(ctx.city.as_deref(), Some("Minneapolis"));
        assert_eq!(ctx.date_day.as_deref(), Some("2026-04-18"));
        assert_eq!(ctx.time_24.as_deref(), Some("20:00"));
        assert_eq!(ctx.raw_title.as_deref(), Some("Hamilton Tickets | viagogo"));
    }

    #[test]
    fn test_meta_smart_on_unknown_site() {
        let html = r#"<html><head>
            <title>Events</title>
            <meta property="og:title" content="Wilco Tickets">
            <meta property="og:description" content="Wilco live in Chicago, IL on June 20, 2026 at 8 pm">
        </head><body></body></html>"#;
        let (source, ctx) = extract(html, Some("https://tickets.example.com/wilco"));
        assert_eq!(source, ContextSource::MetaSmart);
        assert_eq!(ctx.raw_title.as_deref(), Some("Wilco Tickets"));
        assert_eq!(ctx.performer_query.as_deref(), Some("Wilco"));
        assert_eq!(ctx.city.as_deref(), Some("Chicago"));
        assert_eq!(ctx.state.as_deref(), Some("IL"));
        assert_eq!(ctx.date_day.as_deref(), Some("2026-06-20"));
        assert_eq!(ctx.time_24.as_deref(), Some("20:00"));
    }

    #[test]
    fn test_message_round_trip() {
        let page = PageSnapshot::from_html(
            "<html><head><title>Adele | Mar 5, 2026 Los Angeles, CA</title></head></html>",
            Some("https://www.ticketmaster.com/adele/event/0B00"),
        );
        let response = handle_message(&json!({"type": "GET_PAGE_CONTEXT"}), &page).unwrap();
        let wire = serde_json::to_value(&response).unwrap();
        assert_eq!(wire["ok"], json!(true));
        assert_eq!(wire["source"], json!("ticketmaster_title"));
        assert_eq!(wire["context"]["performer_query"], json!("Adele"));
        assert_eq!(wire["context"]["time_24"], json!(null));

        assert!(handle_message(&json!({"type": "SOMETHING_ELSE"}), &page).is_none());
    }
}
