use std::io::BufRead;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ParseError;
use crate::model::{JobType, MavenJob, ASSIGNED_NODE_ELEMENT, MAVEN_ROOT_ELEMENT};

/// Classifies a job document by the local name of its first element.
///
/// Only the prologue and the root start tag are tokenized; anything after the root
/// element opens is never looked at. A document that ends or breaks before any element
/// is an error, not [`JobType::Unknown`].
pub fn classify_job_type(document: &[u8]) -> Result<JobType, ParseError> {
    let mut reader = Reader::from_reader(document);
    let mut buf = Vec::new();
    let root = read_root_element(&mut reader, &mut buf)?;
    Ok(JobType::from_root_element(&root.local_name))
}

/// Decodes a `maven2-moduleset` document into a [`MavenJob`].
///
/// Callers classify first; a document rooted anywhere else is rejected rather than
/// decoded against the wrong schema. The whole root element must be well formed.
/// Only direct `assignedNode` children count: the last one wins and its character
/// data is kept verbatim, with nested elements skipped.
pub fn extract_maven_job(document: &[u8]) -> Result<MavenJob, ParseError> {
    let mut reader = Reader::from_reader(document);
    let mut buf = Vec::new();
    let root = read_root_element(&mut reader, &mut buf)?;
    if root.local_name != MAVEN_ROOT_ELEMENT.as_bytes() {
        return Err(ParseError::UnexpectedRootElement {
            expected: MAVEN_ROOT_ELEMENT,
            found: String::from_utf8_lossy(&root.local_name).into_owned(),
        });
    }

    let mut job = MavenJob::default();
    if root.self_closing {
        return Ok(job);
    }

    let mut text_buf = Vec::new();
    let mut depth = 0_usize;
    loop {
        buf.clear();
        match next_event(&mut reader, &mut buf)? {
            Event::Start(tag) => {
                let is_node = depth == 0 && is_assigned_node(tag.local_name().as_ref());
                if is_node {
                    job.assigned_node = read_character_data(&mut reader, &mut text_buf)?;
                } else {
                    depth += 1;
                }
            }
            Event::Empty(tag) => {
                if depth == 0 && is_assigned_node(tag.local_name().as_ref()) {
                    job.assigned_node.clear();
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Ok(job);
                }
                depth -= 1;
            }
            Event::Eof => {
                return Err(ParseError::UnclosedElement {
                    element: MAVEN_ROOT_ELEMENT,
                })
            }
            _ => {}
        }
    }
}

struct RootElement {
    local_name: Vec<u8>,
    self_closing: bool,
}

fn read_root_element<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
) -> Result<RootElement, ParseError> {
    loop {
        buf.clear();
        match next_event(reader, buf)? {
            Event::Start(tag) => {
                return Ok(RootElement {
                    local_name: tag.local_name().as_ref().to_vec(),
                    self_closing: false,
                });
            }
            Event::Empty(tag) => {
                return Ok(RootElement {
                    local_name: tag.local_name().as_ref().to_vec(),
                    self_closing: true,
                });
            }
            Event::Eof => return Err(ParseError::MissingRootElement),
            _ => {}
        }
    }
}

/// Collects the character data of the element just opened, up to its end tag.
fn read_character_data<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
) -> Result<String, ParseError> {
    let mut text = String::new();
    let mut depth = 0_usize;
    loop {
        buf.clear();
        match next_event(reader, buf)? {
            Event::Text(chunk) if depth == 0 => {
                let unescaped = chunk.unescape().map_err(|source| ParseError::Syntax {
                    position: reader.buffer_position() as u64,
                    source,
                })?;
                text.push_str(&unescaped);
            }
            Event::CData(chunk) if depth == 0 => {
                text.push_str(&String::from_utf8_lossy(&chunk));
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                if depth == 0 {
                    return Ok(text);
                }
                depth -= 1;
            }
            Event::Eof => {
                return Err(ParseError::UnclosedElement {
                    element: ASSIGNED_NODE_ELEMENT,
                })
            }
            _ => {}
        }
    }
}

fn next_event<'b, R: BufRead>(
    reader: &mut Reader<R>,
    buf: &'b mut Vec<u8>,
) -> Result<Event<'b>, ParseError> {
    reader
        .read_event_into(buf)
        .map_err(|source| ParseError::Syntax {
            position: reader.error_position() as u64,
            source,
        })
}

fn is_assigned_node(local_name: &[u8]) -> bool {
    local_name == ASSIGNED_NODE_ELEMENT.as_bytes()
}

#[cfg(test)]
mod tests {
    use super::{classify_job_type, extract_maven_job};
    use crate::error::ParseError;
    use crate::model::JobType;

    const MAVEN_JOB: &str = r#"<?xml version='1.1' encoding='UTF-8'?>
<maven2-moduleset plugin="maven-plugin@3.22">
  <actions/>
  <description>Nightly build</description>
  <keepDependencies>false</keepDependencies>
  <assignedNode>worker-3</assignedNode>
  <canRoam>false</canRoam>
  <rootModule>
    <groupId>com.example</groupId>
    <artifactId>app</artifactId>
  </rootModule>
  <goals>clean install</goals>
</maven2-moduleset>
"#;

    #[test]
    fn classifies_by_root_element() {
        assert_eq!(
            classify_job_type(MAVEN_JOB.as_bytes()).expect("maven"),
            JobType::MavenModuleSet
        );
        assert_eq!(
            classify_job_type(b"<?xml version='1.0'?>\n<!-- freestyle -->\n<project></project>")
                .expect("freestyle"),
            JobType::Freestyle
        );
        assert_eq!(
            classify_job_type(b"<flow-definition plugin=\"workflow-job\"/>").expect("pipeline"),
            JobType::Unknown
        );
    }

    #[test]
    fn namespace_prefix_is_ignored() {
        assert_eq!(
            classify_job_type(b"<j:project xmlns:j=\"urn:jenkins\"/>").expect("prefixed"),
            JobType::Freestyle
        );
    }

    #[test]
    fn classification_stops_at_root_start() {
        let broken_after_root = b"<project><builders><hudson.tasks.Shell></builders>";
        assert_eq!(
            classify_job_type(broken_after_root).expect("root is readable"),
            JobType::Freestyle
        );
    }

    #[test]
    fn document_without_element_is_an_error() {
        assert!(matches!(
            classify_job_type(b""),
            Err(ParseError::MissingRootElement)
        ));
        assert!(matches!(
            classify_job_type(b"<?xml version='1.0'?>\n<!-- nothing here -->\n"),
            Err(ParseError::MissingRootElement)
        ));
    }

    #[test]
    fn truncated_root_tag_is_an_error() {
        assert!(classify_job_type(b"<maven2-mod").is_err());
    }

    #[test]
    fn extracts_assigned_node() {
        let job = extract_maven_job(MAVEN_JOB.as_bytes()).expect("decode");
        assert_eq!(job.assigned_node, "worker-3");
        assert_eq!(job.label(), "worker-3");
    }

    #[test]
    fn missing_assigned_node_defaults_to_empty() {
        let job = extract_maven_job(b"<maven2-moduleset/>").expect("decode empty");
        assert_eq!(job.assigned_node, "");
        assert_eq!(job.label(), "<none>");

        let job = extract_maven_job(b"<maven2-moduleset><goals>verify</goals></maven2-moduleset>")
            .expect("decode without node");
        assert_eq!(job.label(), "<none>");
    }

    #[test]
    fn truncated_maven_document_fails_to_decode() {
        let err = extract_maven_job(b"<maven2-moduleset><assignedNode>lin")
            .expect_err("truncated document");
        assert!(matches!(
            err,
            ParseError::UnclosedElement {
                element: "assignedNode"
            }
        ));
    }

    #[test]
    fn keeps_assigned_node_whitespace() {
        let job = extract_maven_job(
            b"<maven2-moduleset><assignedNode> linux </assignedNode></maven2-moduleset>",
        )
        .expect("padded label");
        assert_eq!(job.assigned_node, " linux ");

        let job = extract_maven_job(
            b"<maven2-moduleset><assignedNode>   </assignedNode></maven2-moduleset>",
        )
        .expect("blank label");
        assert_eq!(job.assigned_node, "   ");
        assert_eq!(job.label(), "   ");
    }

    #[test]
    fn last_assigned_node_wins() {
        let job = extract_maven_job(
            b"<maven2-moduleset><assignedNode>a</assignedNode><assignedNode>b</assignedNode></maven2-moduleset>",
        )
        .expect("repeated label");
        assert_eq!(job.assigned_node, "b");

        let job = extract_maven_job(
            b"<maven2-moduleset><assignedNode>a</assignedNode><assignedNode/></maven2-moduleset>",
        )
        .expect("emptied label");
        assert_eq!(job.label(), "<none>");
    }

    #[test]
    fn mixed_content_skips_child_elements() {
        let job = extract_maven_job(
            b"<maven2-moduleset><assignedNode>a<b>ignored</b>c<!-- note -->&amp;<![CDATA[<d>]]></assignedNode></maven2-moduleset>",
        )
        .expect("mixed content");
        assert_eq!(job.assigned_node, "ac&<d>");
    }

    #[test]
    fn nested_assigned_node_is_not_the_job_label() {
        let job = extract_maven_job(
            b"<maven2-moduleset><reporters><assignedNode>inner</assignedNode></reporters></maven2-moduleset>",
        )
        .expect("nested node");
        assert_eq!(job.label(), "<none>");
    }

    #[test]
    fn syntax_errors_carry_a_byte_position() {
        let err = extract_maven_job(
            b"<maven2-moduleset><assignedNode>x</label></maven2-moduleset>",
        )
        .expect_err("mismatched end tag");
        assert!(matches!(err, ParseError::Syntax { .. }));
        assert!(err.to_string().starts_with("malformed XML at byte "));
    }

    #[test]
    fn rejects_other_root_elements() {
        let err = extract_maven_job(b"<project><assignedNode>linux</assignedNode></project>")
            .expect_err("wrong schema");
        match err {
            ParseError::UnexpectedRootElement { expected, found } => {
                assert_eq!(expected, "maven2-moduleset");
                assert_eq!(found, "project");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
