//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 处理器两级契约测试
//! - 元素流 e2e 测试 (跟踪器 → 分发器 → 处理器)
//! - 随机元素流性质测试

#[cfg(test)]
mod support {
    use bytes::Bytes;
    use contracts::{
        ContractError, ElementKind, ElementValue, FragmentMetadata, Frame, FrameProcessor,
        MkvElement, TagProcessor, TrackMetadata, TAG_FRAGMENT_NUMBER, TAG_SERVER_TIMESTAMP,
    };

    /// One observed `process` call
    #[derive(Debug, Clone, PartialEq)]
    pub struct Call {
        pub frame_track: u64,
        pub resolved_track: u64,
        pub fragment_number: Option<String>,
        pub tags: Option<Vec<(String, Option<String>)>>,
    }

    /// Records every call; implements both tiers
    #[derive(Default)]
    pub struct Recorder {
        pub calls: Vec<Call>,
        pub closed: u32,
        /// Tag names looked up when a tag processor is attached
        pub watched: Vec<String>,
    }

    impl Recorder {
        pub fn watching(names: &[&str]) -> Self {
            Self {
                watched: names.iter().map(|n| n.to_string()).collect(),
                ..Default::default()
            }
        }
    }

    impl FrameProcessor for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn process(
            &mut self,
            frame: &Frame,
            track: &TrackMetadata,
            fragment: Option<&FragmentMetadata>,
        ) -> Result<(), ContractError> {
            self.calls.push(Call {
                frame_track: frame.track_number,
                resolved_track: track.track_number,
                fragment_number: fragment.map(|f| f.fragment_number.clone()),
                tags: None,
            });
            Ok(())
        }

        fn process_with_tags(
            &mut self,
            frame: &Frame,
            track: &TrackMetadata,
            fragment: Option<&FragmentMetadata>,
            tags: Option<&dyn TagProcessor>,
        ) -> Result<(), ContractError> {
            self.process(frame, track, fragment)?;
            let view = tags.map(|t| {
                self.watched
                    .iter()
                    .map(|name| (name.clone(), t.get(name).map(str::to_string)))
                    .collect()
            });
            if let Some(call) = self.calls.last_mut() {
                call.tags = view;
            }
            Ok(())
        }

        fn close(&mut self) -> Result<(), ContractError> {
            self.closed += 1;
            Ok(())
        }
    }

    /// Implements only the plain tier
    #[derive(Default)]
    pub struct PlainOnly {
        pub calls: usize,
    }

    impl FrameProcessor for PlainOnly {
        fn process(
            &mut self,
            _frame: &Frame,
            _track: &TrackMetadata,
            _fragment: Option<&FragmentMetadata>,
        ) -> Result<(), ContractError> {
            self.calls += 1;
            Ok(())
        }
    }

    pub fn frame(track_number: u64, payload: &[u8]) -> Frame {
        Frame {
            track_number,
            timecode: 0,
            key_frame: true,
            invisible: false,
            discardable: false,
            lacing: Default::default(),
            data: Bytes::copy_from_slice(payload),
        }
    }

    pub fn block(track_number: u64) -> MkvElement {
        MkvElement::data(
            ElementKind::SimpleBlock,
            ElementValue::Frame(frame(track_number, b"payload")),
        )
    }

    pub fn tracks(numbers: &[u64]) -> Vec<MkvElement> {
        let mut elements = vec![MkvElement::start(ElementKind::Tracks)];
        for number in numbers {
            elements.extend([
                MkvElement::start(ElementKind::TrackEntry),
                MkvElement::data(ElementKind::TrackNumber, ElementValue::Unsigned(*number)),
                MkvElement::data(ElementKind::CodecId, ElementValue::Text("V_MPEG4/ISO/AVC".into())),
                MkvElement::end(ElementKind::TrackEntry),
            ]);
        }
        elements.push(MkvElement::end(ElementKind::Tracks));
        elements
    }

    pub fn simple_tag(name: &str, value: &str) -> Vec<MkvElement> {
        vec![
            MkvElement::start(ElementKind::SimpleTag),
            MkvElement::data(ElementKind::TagName, ElementValue::Text(name.into())),
            MkvElement::data(ElementKind::TagString, ElementValue::Text(value.into())),
            MkvElement::end(ElementKind::SimpleTag),
        ]
    }

    /// `Tags` element holding the given simple tags
    pub fn tags(pairs: &[(&str, &str)]) -> Vec<MkvElement> {
        let mut elements = vec![
            MkvElement::start(ElementKind::Tags),
            MkvElement::start(ElementKind::Tag),
        ];
        for (name, value) in pairs {
            elements.extend(simple_tag(name, value));
        }
        elements.push(MkvElement::end(ElementKind::Tag));
        elements.push(MkvElement::end(ElementKind::Tags));
        elements
    }

    pub fn fragment_tags(number: u64) -> Vec<MkvElement> {
        tags(&[
            (TAG_FRAGMENT_NUMBER, number.to_string().as_str()),
            (TAG_SERVER_TIMESTAMP, "1700000000.5"),
        ])
    }
}

#[cfg(test)]
mod contract_tests {
    use super::support::{frame, PlainOnly, Recorder};
    use contracts::{Capability, ContractError, FrameProcessor, MkvTag, TagProcessor, TrackMetadata};
    use metadata_tracker::TagCollector;

    #[test]
    fn test_full_tier_without_tags_matches_plain_tier() {
        let track = TrackMetadata::new(1);
        let frame = frame(1, b"abc");

        let mut direct = PlainOnly::default();
        let direct_result = direct.process(&frame, &track, None);

        let mut delegated: Box<dyn FrameProcessor> = Box::new(PlainOnly::default());
        let delegated_result = delegated.process_with_tags(&frame, &track, None, None);

        assert!(direct_result.is_ok());
        assert!(delegated_result.is_ok());
        assert_eq!(direct.calls, 1);

        let mut plain = Recorder::default();
        let mut full = Recorder::default();
        plain.process(&frame, &track, None).unwrap();
        full.process_with_tags(&frame, &track, None, None).unwrap();
        assert_eq!(plain.calls, full.calls);
    }

    #[test]
    fn test_plain_tier_with_tags_is_unimplemented() {
        let mut tags = TagCollector::new();
        tags.process(&MkvTag::new("k", "v"), None);

        let mut processor = PlainOnly::default();
        let err = processor
            .process_with_tags(&frame(1, b"x"), &TrackMetadata::new(1), None, Some(&tags))
            .unwrap_err();

        assert!(matches!(
            err,
            ContractError::Unimplemented {
                capability: Capability::ProcessWithTags,
                ..
            }
        ));
        assert_eq!(processor.calls, 0);
    }

    #[test]
    fn test_nothing_implemented() {
        struct Nothing;
        impl FrameProcessor for Nothing {}

        let mut processor = Nothing;
        let track = TrackMetadata::new(1);
        let frame = frame(1, b"x");

        let plain = processor.process(&frame, &track, None).unwrap_err();
        let full = processor
            .process_with_tags(&frame, &track, None, None)
            .unwrap_err();
        assert!(matches!(
            plain,
            ContractError::Unimplemented {
                capability: Capability::Process,
                ..
            }
        ));
        assert!(matches!(
            full,
            ContractError::Unimplemented {
                capability: Capability::Process,
                ..
            }
        ));
        assert!(processor.close().is_ok());
    }

    #[test]
    fn test_clear_empty_collector_is_noop() {
        let mut tags = TagCollector::new();
        tags.clear();
        tags.clear();
        assert!(tags.is_empty());
        assert_eq!(tags.get("k"), None);
    }
}

#[cfg(test)]
mod e2e_tests {
    use super::support::{block, fragment_tags, simple_tag, tags, tracks, Call, PlainOnly, Recorder};
    use contracts::{
        share_tag_processor, Capability, ContractError, DataElement, ElementKind, MkvElement,
        TagProcessor,
    };
    use frame_visitor::{create_processor, FrameVisitor, TagCollector};

    fn watched(value: Option<&str>) -> Option<Vec<(String, Option<String>)>> {
        Some(vec![("k".to_string(), value.map(str::to_string))])
    }

    /// Tag set inside cluster 1 is gone by the time cluster 2 dispatches
    #[test]
    fn test_cluster_exit_clears_tags() {
        let mut elements = vec![MkvElement::start(ElementKind::Segment)];
        elements.extend(tracks(&[1]));
        elements.push(MkvElement::start(ElementKind::Cluster));
        elements.push(block(1));
        elements.extend(simple_tag("k", "v"));
        elements.push(MkvElement::end(ElementKind::Cluster));
        elements.push(MkvElement::start(ElementKind::Cluster));
        elements.push(block(1));
        elements.push(MkvElement::end(ElementKind::Cluster));

        let shared = share_tag_processor(TagCollector::new());
        let mut visitor = FrameVisitor::create_with_tags(Recorder::watching(&["k"]), shared.clone());
        visitor.visit_all(&elements).unwrap();

        let processor = visitor.processor();
        let calls = &processor.calls;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].tags, watched(None));
        assert_eq!(calls[1].tags, watched(None));
        assert!(shared.borrow().is_empty());
    }

    /// Tags set between clusters belong to the next cluster
    #[test]
    fn test_tags_between_clusters_reach_next_cluster() {
        let mut elements = vec![MkvElement::start(ElementKind::Segment)];
        elements.extend(tracks(&[1]));
        elements.push(MkvElement::start(ElementKind::Cluster));
        elements.push(block(1));
        elements.push(MkvElement::end(ElementKind::Cluster));
        elements.extend(tags(&[("k", "v")]));
        elements.push(MkvElement::start(ElementKind::Cluster));
        elements.push(block(1));
        elements.push(MkvElement::end(ElementKind::Cluster));
        elements.push(MkvElement::start(ElementKind::Cluster));
        elements.push(block(1));
        elements.push(MkvElement::end(ElementKind::Cluster));

        let shared = share_tag_processor(TagCollector::new());
        let mut visitor = FrameVisitor::create_with_tags(Recorder::watching(&["k"]), shared);
        visitor.visit_all(&elements).unwrap();

        let tags_seen: Vec<_> = visitor
            .processor()
            .calls
            .iter()
            .map(|c| c.tags.clone())
            .collect();
        assert_eq!(tags_seen, vec![watched(None), watched(Some("v")), watched(None)]);
    }

    #[test]
    fn test_tags_with_plain_processor_fail_on_first_frame() {
        let mut elements = tracks(&[1]);
        elements.push(MkvElement::start(ElementKind::Cluster));
        elements.push(block(1));
        elements.push(block(1));

        let shared = share_tag_processor(TagCollector::new());
        let mut visitor = FrameVisitor::create_with_tags(PlainOnly::default(), shared);
        let err = visitor.visit_all(&elements).unwrap_err();

        assert!(matches!(
            err,
            ContractError::Unimplemented {
                capability: Capability::ProcessWithTags,
                ..
            }
        ));
        assert_eq!(visitor.processor().calls, 0);
        assert_eq!(visitor.metrics().frames_dispatched(), 0);
    }

    #[test]
    fn test_plain_processor_without_tags() {
        let mut elements = tracks(&[1, 2]);
        elements.push(MkvElement::start(ElementKind::Cluster));
        elements.push(block(1));
        elements.push(block(2));
        elements.push(MkvElement::end(ElementKind::Cluster));

        let mut visitor = FrameVisitor::create(PlainOnly::default());
        visitor.visit_all(&elements).unwrap();
        assert_eq!(visitor.processor().calls, 2);
    }

    #[test]
    fn test_missing_frame_value_fails_fast() {
        let mut elements = tracks(&[1]);
        elements.push(MkvElement::start(ElementKind::Cluster));
        elements.push(MkvElement::Data(DataElement::empty(ElementKind::SimpleBlock)));
        elements.push(block(1));

        let mut visitor = FrameVisitor::create(Recorder::default());
        let err = visitor.visit_all(&elements).unwrap_err();

        assert!(matches!(
            err,
            ContractError::MissingFrameValue {
                kind: ElementKind::SimpleBlock
            }
        ));
        assert!(visitor.processor().calls.is_empty());
    }

    #[test]
    fn test_unrecognized_elements_pass_through() {
        let mut elements = tracks(&[1]);
        elements.push(MkvElement::start(ElementKind::Cluster));
        elements.push(MkvElement::start(ElementKind::Other(0xA0)));
        elements.push(MkvElement::end(ElementKind::Other(0xA0)));
        elements.push(block(1));
        elements.push(MkvElement::end(ElementKind::Cluster));

        let mut visitor = FrameVisitor::create(Recorder::default());
        visitor.visit_all(&elements).unwrap();
        assert_eq!(visitor.processor().calls.len(), 1);
    }

    #[test]
    fn test_close_forwards_once() {
        let mut visitor = FrameVisitor::create(Recorder::default());
        visitor.visit_all(&tracks(&[1])).unwrap();
        visitor.close().unwrap();
        visitor.close().unwrap();
        assert_eq!(visitor.processor().closed, 1);
    }

    #[test]
    fn test_fragment_metadata_follows_stream() {
        let mut elements = vec![MkvElement::start(ElementKind::Segment)];
        elements.extend(tracks(&[1]));
        elements.push(MkvElement::start(ElementKind::Cluster));
        elements.push(block(1));
        elements.push(MkvElement::end(ElementKind::Cluster));
        elements.extend(fragment_tags(41));
        elements.push(MkvElement::start(ElementKind::Cluster));
        elements.push(block(1));
        elements.push(MkvElement::end(ElementKind::Cluster));
        elements.extend(fragment_tags(42));
        elements.push(MkvElement::start(ElementKind::Cluster));
        elements.push(block(1));
        elements.push(MkvElement::end(ElementKind::Cluster));

        let mut visitor = FrameVisitor::create(Recorder::default());
        visitor.visit_all(&elements).unwrap();

        let fragments: Vec<_> = visitor
            .processor()
            .calls
            .iter()
            .map(|c| c.fragment_number.clone())
            .collect();
        assert_eq!(
            fragments,
            vec![None, Some("41".to_string()), Some("42".to_string())]
        );
        let previous = visitor.tracker().previous_fragment_metadata().unwrap();
        assert_eq!(previous.fragment_number, "41");
        assert_eq!(previous.server_side_timestamp_ms, Some(1_700_000_000_500));
    }

    #[test]
    fn test_file_processor_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!(
            "[input]\npath = \"elements.jsonl\"\n\n[tags]\nenabled = true\n\n[processor]\nname = \"disk\"\nprocessor_type = \"file\"\n[processor.params]\nbase_path = {:?}\n",
            dir.path().join("out").display().to_string()
        );
        let blueprint =
            config_loader::ConfigLoader::load_from_str(&content, config_loader::ConfigFormat::Toml)
                .unwrap();

        let processor = create_processor(&blueprint.processor).unwrap();
        let shared = share_tag_processor(TagCollector::new());
        let mut visitor = FrameVisitor::create_with_tags(processor, shared);

        let mut elements = tracks(&[1, 2]);
        elements.extend(fragment_tags(7));
        elements.push(MkvElement::start(ElementKind::Cluster));
        elements.extend(simple_tag("camera", "front"));
        elements.push(block(2));
        elements.push(block(1));
        elements.push(MkvElement::end(ElementKind::Cluster));
        visitor.visit_all(&elements).unwrap();
        visitor.close().unwrap();

        let out = dir.path().join("out");
        assert!(out.join("track_2/0.bin").exists());
        assert!(out.join("track_1/1.bin").exists());

        let index = std::fs::read_to_string(out.join("frames.jsonl")).unwrap();
        let records: Vec<serde_json::Value> = index
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["fragment_number"], "7");
        assert_eq!(records[0]["tag_count"], 1);
        assert_eq!(records[1]["codec_id"], "V_MPEG4/ISO/AVC");
    }

    #[test]
    fn test_recorded_call_shape() {
        let mut elements = tracks(&[3]);
        elements.push(block(3));

        let mut visitor = FrameVisitor::create(Recorder::default());
        visitor.visit_all(&elements).unwrap();
        assert_eq!(
            visitor.processor().calls,
            vec![Call {
                frame_track: 3,
                resolved_track: 3,
                fragment_number: None,
                tags: None,
            }]
        );
    }
}

#[cfg(test)]
mod property_tests {
    use super::support::{block, fragment_tags, simple_tag, tracks, Recorder};
    use contracts::{share_tag_processor, ElementKind, MkvElement, TagProcessor};
    use frame_visitor::{FrameVisitor, TagCollector};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// What a frame is expected to observe
    #[derive(Debug, Clone, PartialEq)]
    struct Expected {
        track: u64,
        fragment: Option<String>,
        /// Value of tag "k" visible to the frame
        tag: Option<String>,
    }

    /// Random stream of tracks, fragments, clusters, tags and frames
    fn random_stream(rng: &mut StdRng) -> (Vec<MkvElement>, Vec<Expected>) {
        let track_numbers: Vec<u64> = (1..=rng.random_range(1..=4u64)).collect();
        let mut elements = vec![MkvElement::start(ElementKind::Segment)];
        elements.extend(tracks(&track_numbers));

        let mut expected = Vec::new();
        let mut fragment: Option<String> = None;
        let mut tag: Option<String> = None;

        for cluster in 0..rng.random_range(1..8u64) {
            if rng.random_bool(0.6) {
                let number = 100 + cluster;
                elements.extend(fragment_tags(number));
                fragment = Some(number.to_string());
            }

            elements.push(MkvElement::start(ElementKind::Cluster));
            for step in 0..rng.random_range(0..12u32) {
                if rng.random_bool(0.2) {
                    let value = format!("c{cluster}s{step}");
                    elements.extend(simple_tag("k", &value));
                    tag = Some(value);
                }
                let track = track_numbers[rng.random_range(0..track_numbers.len())];
                elements.push(block(track));
                expected.push(Expected {
                    track,
                    fragment: fragment.clone(),
                    tag: tag.clone(),
                });
            }
            elements.push(MkvElement::end(ElementKind::Cluster));
            tag = None;
        }
        elements.push(MkvElement::end(ElementKind::Segment));
        (elements, expected)
    }

    #[test]
    fn test_every_frame_dispatched_once_with_context() {
        let mut rng = StdRng::seed_from_u64(0x4d4b56);
        for _ in 0..64 {
            let (elements, expected) = random_stream(&mut rng);

            let shared = share_tag_processor(TagCollector::new());
            let mut visitor =
                FrameVisitor::create_with_tags(Recorder::watching(&["k"]), shared.clone());
            let visited = visitor.visit_all(&elements).unwrap();
            visitor.close().unwrap();

            assert_eq!(visited, elements.len() as u64);
            let processor = visitor.processor();
            assert_eq!(processor.calls.len(), expected.len());
            for (call, want) in processor.calls.iter().zip(&expected) {
                assert_eq!(call.frame_track, want.track);
                assert_eq!(call.resolved_track, want.track);
                assert_eq!(call.fragment_number, want.fragment);
                assert_eq!(
                    call.tags,
                    Some(vec![("k".to_string(), want.tag.clone())])
                );
            }
            assert_eq!(processor.closed, 1);
            assert!(shared.borrow().is_empty());
        }
    }

    #[test]
    fn test_metrics_agree_with_stream() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..32 {
            let (elements, expected) = random_stream(&mut rng);
            let clusters = elements
                .iter()
                .filter(|e| **e == MkvElement::end(ElementKind::Cluster))
                .count() as u64;

            let mut visitor = FrameVisitor::create(Recorder::default());
            visitor.visit_all(elements.iter()).unwrap();

            let snapshot = visitor.metrics().snapshot();
            assert_eq!(snapshot.elements_visited, elements.len() as u64);
            assert_eq!(snapshot.frames_dispatched, expected.len() as u64);
            assert_eq!(snapshot.clusters_closed, clusters);
            assert_eq!(visitor.tracker().cluster_count(), clusters);
        }
    }
}
