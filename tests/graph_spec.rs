use cascade_publisher::cascade::*;
use cascade_publisher::models::*;
use speculate2::speculate;
use std::collections::HashMap;
use uuid::Uuid;

fn object(data_type: &str, rel: &str, codename: &str) -> String {
    format!(
        r#"<object type="application/kenticocloud" data-type="{}" data-rel="{}" data-codename="{}"></object>"#,
        data_type, rel, codename
    )
}

fn item_with_body(type_codename: &str, markup: &str) -> ContentItem {
    ContentItem::new(Uuid::new_v4(), "subject", type_codename)
        .with_element("body", Element::rich_text(markup))
}

fn pool_of(codenames: &[&str]) -> HashMap<String, ContentItem> {
    codenames
        .iter()
        .map(|c| (c.to_string(), ContentItem::new(Uuid::new_v4(), *c, "article")))
        .collect()
}

speculate! {
    describe "parse_embedded_references" {
        it "reads links and components in document order" {
            let markup = format!(
                "<p>Intro</p>{}<p>middle</p>{}",
                object("item", "component", "n270aa43a_0910"),
                object("item", "link", "getting_started"),
            );

            let refs = parse_embedded_references(&markup);

            assert_eq!(refs, vec![
                EmbeddedReference { relation: Relation::Component, codename: "n270aa43a_0910".to_string() },
                EmbeddedReference { relation: Relation::Link, codename: "getting_started".to_string() },
            ]);
        }

        it "ignores objects from other producers" {
            let markup = r#"<object type="application/x-shockwave-flash" data-type="item" data-rel="link" data-codename="flash"></object>"#;
            assert!(parse_embedded_references(markup).is_empty());
        }

        it "ignores objects that are not items" {
            let markup = object("asset", "link", "logo");
            assert!(parse_embedded_references(&markup).is_empty());
        }

        it "ignores unknown relations and empty codenames" {
            let markup = format!("{}{}", object("item", "embed", "video"), object("item", "link", " "));
            assert!(parse_embedded_references(&markup).is_empty());
        }

        it "accepts reordered attributes and single quotes" {
            let markup = "<OBJECT data-codename='faq' data-rel='link' data-type='item' type='application/kenticocloud'></OBJECT>";

            let refs = parse_embedded_references(markup);

            assert_eq!(refs.len(), 1);
            assert_eq!(refs[0].codename, "faq");
            assert_eq!(refs[0].relation, Relation::Link);
        }

        it "does not recognize unquoted attributes" {
            let markup = "<object type=application/kenticocloud data-type=item data-rel=link data-codename=faq></object>";
            assert!(parse_embedded_references(markup).is_empty());
        }

        it "returns nothing for plain markup" {
            assert!(parse_embedded_references("<p>No objects here</p>").is_empty());
        }
    }

    describe "extract_children" {
        it "splits references into linked items and components" {
            let markup = format!(
                "{}{}{}",
                object("item", "link", "a"),
                object("item", "component", "c1"),
                object("item", "link", "b"),
            );
            let item = item_with_body("article", &markup);

            let children = extract_children(&item);

            assert_eq!(children.linked_items, vec!["a", "b"]);
            assert_eq!(children.components, vec!["c1"]);
        }

        it "drops duplicate references keeping the first position" {
            let markup = format!(
                "{}{}{}",
                object("item", "link", "a"),
                object("item", "link", "b"),
                object("item", "link", "a"),
            );
            let item = item_with_body("article", &markup);

            assert_eq!(extract_children(&item).linked_items, vec!["a", "b"]);
        }

        it "scans every rich text element" {
            let item = ContentItem::new(Uuid::new_v4(), "page", "article")
                .with_element("intro", Element::rich_text(object("item", "link", "first")))
                .with_element("outro", Element::rich_text(object("item", "link", "second")));

            assert_eq!(extract_children(&item).linked_items, vec!["first", "second"]);
        }

        it "ignores modular content of regular items" {
            let item = item_with_body("article", "")
                .with_element("related", Element::linked_items(["other"]));

            assert!(extract_children(&item).linked_items.is_empty());
        }

        it "adds modular content of legacy items after rich text links" {
            let item = item_with_body("zapi_schema_object", &object("item", "link", "in_text"))
                .with_element("properties", Element::linked_items(["prop_a", "in_text"]));

            assert_eq!(extract_children(&item).linked_items, vec!["in_text", "prop_a"]);
        }

        it "splits comma joined modular content values" {
            let item = ContentItem::new(Uuid::new_v4(), "op", "zapi_path_operation").with_element(
                "responses",
                Element {
                    kind: ElementKind::ModularContent,
                    value: ElementValue::Text("ok_200, not_found_404,".to_string()),
                },
            );

            assert_eq!(extract_children(&item).linked_items, vec!["ok_200", "not_found_404"]);
        }
    }

    describe "resolve" {
        it "drops codenames missing from the pool" {
            let children = ChildCodenames {
                linked_items: vec!["present".to_string(), "deleted".to_string()],
                components: vec!["gone".to_string()],
            };
            let pool = pool_of(&["present"]);

            let resolved = children.resolve(&pool);

            assert_eq!(resolved.linked_items.len(), 1);
            assert_eq!(resolved.linked_items[0].codename, "present");
            assert!(resolved.components.is_empty());
        }
    }

    describe "item kinds" {
        it "recognizes the composite type" {
            assert_eq!(ItemKind::from_type_codename("code_samples"), ItemKind::Composite);
        }

        it "recognizes legacy types by marker" {
            assert_eq!(ItemKind::from_type_codename("zapi_security_scheme"), ItemKind::Legacy);
        }

        it "treats everything else as regular" {
            assert_eq!(ItemKind::from_type_codename("code_sample"), ItemKind::Regular);
            assert_eq!(ItemKind::from_type_codename("article"), ItemKind::Regular);
        }

        it "maps delivery element types" {
            assert_eq!(ElementKind::from_type("rich_text"), ElementKind::RichText);
            assert_eq!(ElementKind::from_type("modular_content"), ElementKind::ModularContent);
            assert_eq!(ElementKind::from_type("number"), ElementKind::Other);
        }

        it "lists composite children in declared order" {
            let bundle = ContentItem::new(Uuid::new_v4(), "bundle", COMPOSITE_TYPE)
                .with_element(COMPOSITE_CHILDREN_ELEMENT, Element::linked_items(["z", "a", "m"]));

            assert_eq!(bundle.ordered_children(), vec!["z", "a", "m"]);
        }

        it "has no ordered children when not composite" {
            let item = ContentItem::new(Uuid::new_v4(), "plain", "article")
                .with_element(COMPOSITE_CHILDREN_ELEMENT, Element::linked_items(["x"]));

            assert!(item.ordered_children().is_empty());
        }
    }
}
