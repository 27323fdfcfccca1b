// Matcher scenarios used by the generated-parser tests.

use pegc::runtime::{Node, Value};

// Item: 'a' | 'b'
#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, unused_assignments, unreachable_code, clippy::all)]
pub fn match_Item<M: ::pegc::runtime::Memo>(p: &mut ::pegc::runtime::Parser<'_, M>) -> Option<::pegc::runtime::Node> {
    let matchrule = "Item";
    let mut result = p.construct(matchrule, matchrule, &[]);
    let ok_0 = 'alt_0: {
        if let Some(m) = p.literal("a") {
            result.text.push_str(m);
            break 'alt_0 true;
        }
        if let Some(m) = p.literal("b") {
            result.text.push_str(m);
            break 'alt_0 true;
        }
        false
    };
    if ok_0 {
        return Some(result);
    } else {
        return None;
    }
    None
}

// Repeated: item:Item+
#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, unused_assignments, unreachable_code, clippy::all)]
pub fn match_Repeated<M: ::pegc::runtime::Memo>(p: &mut ::pegc::runtime::Parser<'_, M>) -> Option<::pegc::runtime::Node> {
    let matchrule = "Repeated";
    let mut result = p.construct(matchrule, matchrule, &[]);
    let mut count_0 = 0usize;
    'rep_0: loop {
        let pos_0 = p.pos();
        p.push_frame(result);
        let subres = p.call(0, match_Item::<M>);
        result = p.pop_frame();
        if let Some(subres) = subres {
            p.store(&mut result, subres, Some("item"));
            count_0 += 1;
            if p.pos() == pos_0 {
                break 'rep_0;
            }
        } else {
            break 'rep_0;
        }
    }
    if count_0 > 0 {
        return Some(result);
    } else {
        return None;
    }
    None
}

// NoMatch: 'x' !'y'
#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, unused_assignments, unreachable_code, clippy::all)]
pub fn match_NoMatch<M: ::pegc::runtime::Memo>(p: &mut ::pegc::runtime::Parser<'_, M>) -> Option<::pegc::runtime::Node> {
    let matchrule = "NoMatch";
    let mut result = p.construct(matchrule, matchrule, &[]);
    let pos_0 = p.pos();
    let res_0 = result.clone();
    let ok_0 = 'seq_0: {
        if let Some(m) = p.literal("x") {
            result.text.push_str(m);
        } else {
            break 'seq_0 false;
        }
        let pos_1 = p.pos();
        let res_1 = result.clone();
        let ok_1 = 'look_1: {
            if let Some(m) = p.literal("y") {
                result.text.push_str(m);
            } else {
                break 'look_1 false;
            }
            true
        };
        p.seek(pos_1);
        result = res_1;
        if ok_1 {
            break 'seq_0 false;
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

// Greedy: 'a'* 'a'
#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, unused_assignments, unreachable_code, clippy::all)]
pub fn match_Greedy<M: ::pegc::runtime::Memo>(p: &mut ::pegc::runtime::Parser<'_, M>) -> Option<::pegc::runtime::Node> {
    let matchrule = "Greedy";
    let mut result = p.construct(matchrule, matchrule, &[]);
    let pos_0 = p.pos();
    let res_0 = result.clone();
    let ok_0 = 'seq_0: {
        'rep_1: loop {
            let pos_1 = p.pos();
            if let Some(m) = p.literal("a") {
                result.text.push_str(m);
                if p.pos() == pos_1 {
                    break 'rep_1;
                }
            } else {
                break 'rep_1;
            }
        }
        if let Some(m) = p.literal("a") {
            result.text.push_str(m);
        } else {
            break 'seq_0 false;
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

// Choice: 'ab' | 'a' | 'c'
#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, unused_assignments, unreachable_code, clippy::all)]
pub fn match_Choice<M: ::pegc::runtime::Memo>(p: &mut ::pegc::runtime::Parser<'_, M>) -> Option<::pegc::runtime::Node> {
    let matchrule = "Choice";
    let mut result = p.construct(matchrule, matchrule, &[]);
    let ok_0 = 'alt_0: {
        if let Some(m) = p.literal("ab") {
            result.text.push_str(m);
            break 'alt_0 true;
        }
        if let Some(m) = p.literal("a") {
            result.text.push_str(m);
            break 'alt_0 true;
        }
        if let Some(m) = p.literal("c") {
            result.text.push_str(m);
            break 'alt_0 true;
        }
        false
    };
    if ok_0 {
        return Some(result);
    } else {
        return None;
    }
    None
}

// Word: /[a-z]+/
#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, unused_assignments, unreachable_code, clippy::all)]
pub fn match_Word<M: ::pegc::runtime::Memo>(p: &mut ::pegc::runtime::Parser<'_, M>) -> Option<::pegc::runtime::Node> {
    let matchrule = "Word";
    let mut result = p.construct(matchrule, matchrule, &[]);
    if let Some(m) = p.rx("[a-z]+") {
        result.text.push_str(m);
        return Some(result);
    } else {
        return None;
    }
    None
}

// Num: /[0-9]+/
#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, unused_assignments, unreachable_code, clippy::all)]
pub fn match_Num<M: ::pegc::runtime::Memo>(p: &mut ::pegc::runtime::Parser<'_, M>) -> Option<::pegc::runtime::Node> {
    let matchrule = "Num";
    let mut result = p.construct(matchrule, matchrule, &[]);
    if let Some(m) = p.rx("[0-9]+") {
        result.text.push_str(m);
        return Some(result);
    } else {
        return None;
    }
    None
}

// Open: '<' kind:/\w+/ '>' $kind '</$kind>'
#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, unused_assignments, unreachable_code, clippy::all)]
pub fn match_Open<M: ::pegc::runtime::Memo>(p: &mut ::pegc::runtime::Parser<'_, M>) -> Option<::pegc::runtime::Node> {
    let matchrule = "Open";
    let mut result = p.construct(matchrule, matchrule, &[]);
    let pos_0 = p.pos();
    let res_0 = result.clone();
    let ok_0 = 'seq_0: {
        if let Some(m) = p.literal("<") {
            result.text.push_str(m);
        } else {
            break 'seq_0 false;
        }
        p.push_frame(result);
        result = p.construct(matchrule, "kind", &[]);
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
            p.store(&mut result, subres, Some("kind"));
        } else {
            result = p.pop_frame();
            break 'seq_0 false;
        }
        if let Some(m) = p.literal(">") {
            result.text.push_str(m);
        } else {
            break 'seq_0 false;
        }
        let callee_2 = p.expression(&result, "kind", Scenarios_accessor);
        p.push_frame(result);
        let subres = match Scenarios_dispatch::<M>(&callee_2) {
            Some((key, matcher)) => p.call_with(key, matcher),
            None => None,
        };
        result = p.pop_frame();
        if let Some(subres) = subres {
            p.store(&mut result, subres, None);
        } else {
            break 'seq_0 false;
        }
        let lit_3 = [String::from("</"), p.expression(&result, "kind", Scenarios_accessor), String::from(">")].concat();
        if let Some(m) = p.literal(&lit_3) {
            result.text.push_str(m);
        } else {
            break 'seq_0 false;
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

// Base: :Word .',' :Num?
#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, unused_assignments, unreachable_code, clippy::all)]
pub fn match_Base<M: ::pegc::runtime::Memo>(p: &mut ::pegc::runtime::Parser<'_, M>) -> Option<::pegc::runtime::Node> {
    let matchrule = "Base";
    let mut result = p.construct(matchrule, matchrule, &[]);
    let pos_0 = p.pos();
    let res_0 = result.clone();
    let ok_0 = 'seq_0: {
        p.push_frame(result);
        let subres = p.call(5, match_Word::<M>);
        result = p.pop_frame();
        if let Some(subres) = subres {
            result.text.push_str(&subres.text);
            Base_STR(&mut result, subres);
        } else {
            break 'seq_0 false;
        }
        if !(p.literal(",").is_some()) {
            break 'seq_0 false;
        }
        p.push_frame(result);
        let subres = p.call(6, match_Num::<M>);
        result = p.pop_frame();
        if let Some(subres) = subres {
            result.text.push_str(&subres.text);
            Base_STR(&mut result, subres);
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

#[allow(non_snake_case, dead_code)]
fn Base_STR(res: &mut Node, sub: Node) {
    res.fields.insert(sub.name.clone(), Value::Str(sub.text.to_uppercase()));
}

// Child: :Word .',' :Num?
#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, unused_assignments, unreachable_code, clippy::all)]
pub fn match_Child<M: ::pegc::runtime::Memo>(p: &mut ::pegc::runtime::Parser<'_, M>) -> Option<::pegc::runtime::Node> {
    let matchrule = "Child";
    let mut result = p.construct(matchrule, matchrule, &[]);
    let pos_0 = p.pos();
    let res_0 = result.clone();
    let ok_0 = 'seq_0: {
        p.push_frame(result);
        let subres = p.call(5, match_Word::<M>);
        result = p.pop_frame();
        if let Some(subres) = subres {
            result.text.push_str(&subres.text);
            Base_STR(&mut result, subres);
        } else {
            break 'seq_0 false;
        }
        if !(p.literal(",").is_some()) {
            break 'seq_0 false;
        }
        p.push_frame(result);
        let subres = p.call(6, match_Num::<M>);
        result = p.pop_frame();
        if let Some(subres) = subres {
            result.text.push_str(&subres.text);
            Base_STR(&mut result, subres);
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

// Silent: .(t:'a' 'b') 'c'
#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, unused_assignments, unreachable_code, clippy::all)]
pub fn match_Silent<M: ::pegc::runtime::Memo>(p: &mut ::pegc::runtime::Parser<'_, M>) -> Option<::pegc::runtime::Node> {
    let matchrule = "Silent";
    let mut result = p.construct(matchrule, matchrule, &[]);
    let pos_0 = p.pos();
    let res_0 = result.clone();
    let ok_0 = 'seq_0: {
        let text_1 = result.text.len();
        let fields_1 = result.fields.clone();
        let pos_2 = p.pos();
        let res_2 = result.clone();
        let ok_2 = 'seq_2: {
            p.push_frame(result);
            result = p.construct(matchrule, "t", &[]);
            let ok_3 = 'tag_3: {
                if let Some(m) = p.literal("a") {
                    result.text.push_str(m);
                } else {
                    break 'tag_3 false;
                }
                true
            };
            if ok_3 {
                let subres = result;
                result = p.pop_frame();
                p.store(&mut result, subres, Some("t"));
            } else {
                result = p.pop_frame();
                break 'seq_2 false;
            }
            if let Some(m) = p.literal("b") {
                result.text.push_str(m);
            } else {
                break 'seq_2 false;
            }
            true
        };
        if ok_2 {
            result.text.truncate(text_1);
            result.fields = fields_1;
        } else {
            p.seek(pos_2);
            result = res_2;
            break 'seq_0 false;
        }
        if let Some(m) = p.literal("c") {
            result.text.push_str(m);
        } else {
            break 'seq_0 false;
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

// T: '$k'
#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, unused_assignments, unreachable_code, clippy::all)]
pub fn match_T<M: ::pegc::runtime::Memo>(p: &mut ::pegc::runtime::Parser<'_, M>) -> Option<::pegc::runtime::Node> {
    let matchrule = "T";
    let mut result = p.construct(matchrule, matchrule, &[]);
    let lit_0 = [p.expression(&result, "k", Scenarios_accessor)].concat();
    if let Some(m) = p.literal(&lit_0) {
        result.text.push_str(m);
        return Some(result);
    } else {
        return None;
    }
    None
}

// R1: 'a' T 'c'
#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, unused_assignments, unreachable_code, clippy::all)]
pub fn match_R1<M: ::pegc::runtime::Memo>(p: &mut ::pegc::runtime::Parser<'_, M>) -> Option<::pegc::runtime::Node> {
    let matchrule = "R1";
    let mut result = p.construct(matchrule, matchrule, &[("k", "b")]);
    let pos_0 = p.pos();
    let res_0 = result.clone();
    let ok_0 = 'seq_0: {
        if let Some(m) = p.literal("a") {
            result.text.push_str(m);
        } else {
            break 'seq_0 false;
        }
        p.push_frame(result);
        let subres = p.call_unmemoized(match_T::<M>);
        result = p.pop_frame();
        if let Some(subres) = subres {
            p.store(&mut result, subres, None);
        } else {
            break 'seq_0 false;
        }
        if let Some(m) = p.literal("c") {
            result.text.push_str(m);
        } else {
            break 'seq_0 false;
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

// R2: 'a' T
#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, unused_assignments, unreachable_code, clippy::all)]
pub fn match_R2<M: ::pegc::runtime::Memo>(p: &mut ::pegc::runtime::Parser<'_, M>) -> Option<::pegc::runtime::Node> {
    let matchrule = "R2";
    let mut result = p.construct(matchrule, matchrule, &[("k", "a")]);
    let pos_0 = p.pos();
    let res_0 = result.clone();
    let ok_0 = 'seq_0: {
        if let Some(m) = p.literal("a") {
            result.text.push_str(m);
        } else {
            break 'seq_0 false;
        }
        p.push_frame(result);
        let subres = p.call_unmemoized(match_T::<M>);
        result = p.pop_frame();
        if let Some(subres) = subres {
            p.store(&mut result, subres, None);
        } else {
            break 'seq_0 false;
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

// S: R1 | R2
#[allow(non_snake_case, unused_mut, unused_variables, unused_labels, unused_assignments, unreachable_code, clippy::all)]
pub fn match_S<M: ::pegc::runtime::Memo>(p: &mut ::pegc::runtime::Parser<'_, M>) -> Option<::pegc::runtime::Node> {
    let matchrule = "S";
    let mut result = p.construct(matchrule, matchrule, &[]);
    let ok_0 = 'alt_0: {
        p.push_frame(result);
        let subres = p.call_unmemoized(match_R1::<M>);
        result = p.pop_frame();
        if let Some(subres) = subres {
            p.store(&mut result, subres, None);
            break 'alt_0 true;
        }
        p.push_frame(result);
        let subres = p.call_unmemoized(match_R2::<M>);
        result = p.pop_frame();
        if let Some(subres) = subres {
            p.store(&mut result, subres, None);
            break 'alt_0 true;
        }
        false
    };
    if ok_0 {
        return Some(result);
    } else {
        return None;
    }
    None
}

// Scenarios: rule dispatch
#[allow(non_snake_case, dead_code, clippy::all)]
pub fn Scenarios_dispatch<'i, M: ::pegc::runtime::Memo>(name: &str) -> Option<(Option<usize>, ::pegc::runtime::Matcher<'i, M>)> {
    match name {
        "Item" => Some((Some(0), match_Item::<M> as ::pegc::runtime::Matcher<'i, M>)),
        "Repeated" => Some((Some(1), match_Repeated::<M> as ::pegc::runtime::Matcher<'i, M>)),
        "NoMatch" => Some((Some(2), match_NoMatch::<M> as ::pegc::runtime::Matcher<'i, M>)),
        "Greedy" => Some((Some(3), match_Greedy::<M> as ::pegc::runtime::Matcher<'i, M>)),
        "Choice" => Some((Some(4), match_Choice::<M> as ::pegc::runtime::Matcher<'i, M>)),
        "Word" => Some((Some(5), match_Word::<M> as ::pegc::runtime::Matcher<'i, M>)),
        "Num" => Some((Some(6), match_Num::<M> as ::pegc::runtime::Matcher<'i, M>)),
        "Open" => Some((None, match_Open::<M> as ::pegc::runtime::Matcher<'i, M>)),
        "Base" => Some((Some(8), match_Base::<M> as ::pegc::runtime::Matcher<'i, M>)),
        "Child" => Some((Some(9), match_Child::<M> as ::pegc::runtime::Matcher<'i, M>)),
        "Silent" => Some((Some(10), match_Silent::<M> as ::pegc::runtime::Matcher<'i, M>)),
        "T" => Some((None, match_T::<M> as ::pegc::runtime::Matcher<'i, M>)),
        "R1" => Some((None, match_R1::<M> as ::pegc::runtime::Matcher<'i, M>)),
        "R2" => Some((None, match_R2::<M> as ::pegc::runtime::Matcher<'i, M>)),
        "S" => Some((None, match_S::<M> as ::pegc::runtime::Matcher<'i, M>)),
        _ => None,
    }
}

// Scenarios: semantic value accessors
#[allow(non_snake_case, dead_code, unused_variables, clippy::all)]
pub fn Scenarios_accessor(node: &::pegc::runtime::Node, name: &str) -> Option<String> {
    match (node.matchrule.as_str(), name) {
        _ => None,
    }
}
