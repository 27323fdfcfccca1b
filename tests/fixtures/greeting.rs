// Greeting parser used by the generated-parser tests.

use pegc::runtime::Node;

// Greeting: 'hello' [ name:/\w+/ ] :Mark?
#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, unused_assignments, unreachable_code, clippy::all)]
pub fn match_Greeting<M: ::pegc::runtime::Memo>(p: &mut ::pegc::runtime::Parser<'_, M>) -> Option<::pegc::runtime::Node> {
    let matchrule = "Greeting";
    let mut result = p.construct(matchrule, matchrule, &[]);
    let pos_0 = p.pos();
    let res_0 = result.clone();
    let ok_0 = 'seq_0: {
        if let Some(m) = p.literal("hello") {
            result.text.push_str(m);
        } else {
            break 'seq_0 false;
        }
        if let Some(m) = p.whitespace(false) {
            result.text.push_str(m);
        } else {
            break 'seq_0 false;
        }
        p.push_frame(result);
        result = p.construct(matchrule, "name", &[]);
        let ok_1 = 'tag_1: {
            if let Some(m) = p.rx("\\w+") {
                result.text.push_str(m);
            } else {
                break 'tag_1 false;
            }
            true
        };
        if ok_1 {
            let subres = result;
            result = p.pop_frame();
            p.store(&mut result, subres, Some("name"));
        } else {
            result = p.pop_frame();
            break 'seq_0 false;
        }
        if let Some(m) = p.whitespace(false) {
            result.text.push_str(m);
        } else {
            break 'seq_0 false;
        }
        p.push_frame(result);
        let subres = p.call(1, match_Mark::<M>);
        result = p.pop_frame();
        if let Some(subres) = subres {
            p.store(&mut result, subres, Some("Mark"));
        }
        true
    };
    if ok_0 {
        return Some(result);
    } else {
        p.seek(pos_0);
        result = res_0;
        return None;
    }
    None
}

// Mark: '!'
#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, unused_assignments, unreachable_code, clippy::all)]
pub fn match_Mark<M: ::pegc::runtime::Memo>(p: &mut ::pegc::runtime::Parser<'_, M>) -> Option<::pegc::runtime::Node> {
    let matchrule = "Mark";
    let mut result = p.construct(matchrule, matchrule, &[]);
    if let Some(m) = p.literal("!") {
        result.text.push_str(m);
        Mark__finalise(&mut result);
        return Some(result);
    } else {
        return None;
    }
    None
}

#[allow(non_snake_case, dead_code)]
fn Mark__finalise(res: &mut Node) {
    res.text.push('!');
}

// Greeting: rule dispatch
#[allow(non_snake_case, dead_code, clippy::all)]
pub fn Greeting_dispatch<'i, M: ::pegc::runtime::Memo>(name: &str) -> Option<(Option<usize>, ::pegc::runtime::Matcher<'i, M>)> {
    match name {
        "Greeting" => Some((Some(0), match_Greeting::<M> as ::pegc::runtime::Matcher<'i, M>)),
        "Mark" => Some((Some(1), match_Mark::<M> as ::pegc::runtime::Matcher<'i, M>)),
        _ => None,
    }
}

// Greeting: semantic value accessors
#[allow(non_snake_case, dead_code, unused_variables, clippy::all)]
pub fn Greeting_accessor(node: &::pegc::runtime::Node, name: &str) -> Option<String> {
    match (node.matchrule.as_str(), name) {
        _ => None,
    }
}
